//! Tool variants: which kind of dummy object a tool places.

use crate::messages::{Semantic, Shape};
use serde::{Deserialize, Serialize};

/// The two dummy object tools differ only in these constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectVariant {
    Car,
    Pedestrian,
}

impl ObjectVariant {
    /// Returns both variants.
    pub fn all() -> [ObjectVariant; 2] {
        [ObjectVariant::Car, ObjectVariant::Pedestrian]
    }

    /// Display name shown in the host's tool bar.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ObjectVariant::Car => "2D Dummy Car",
            ObjectVariant::Pedestrian => "2D Dummy Pedestrian",
        }
    }

    /// Keyboard shortcut that activates the tool.
    pub fn shortcut_key(&self) -> char {
        match self {
            ObjectVariant::Car => 'k',
            ObjectVariant::Pedestrian => 'l',
        }
    }

    /// Semantic type constant carried in the message.
    pub fn semantic_type(&self) -> u8 {
        match self {
            ObjectVariant::Car => Semantic::CAR,
            ObjectVariant::Pedestrian => Semantic::PEDESTRIAN,
        }
    }

    /// Fixed bounding box (length, width, height) in meters.
    pub fn shape(&self) -> Shape {
        match self {
            ObjectVariant::Car => Shape::bounding_box(4.0, 1.8, 2.0),
            ObjectVariant::Pedestrian => Shape::bounding_box(0.8, 0.8, 2.0),
        }
    }
}

impl std::fmt::Display for ObjectVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectVariant::Car => write!(f, "car"),
            ObjectVariant::Pedestrian => write!(f, "pedestrian"),
        }
    }
}

impl std::str::FromStr for ObjectVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "car" | "vehicle" => Ok(ObjectVariant::Car),
            "pedestrian" | "ped" => Ok(ObjectVariant::Pedestrian),
            _ => Err(format!("Unknown variant: {} (expected car or pedestrian)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_constants() {
        let car = ObjectVariant::Car;
        assert_eq!(car.tool_name(), "2D Dummy Car");
        assert_eq!(car.shortcut_key(), 'k');
        assert_eq!(car.semantic_type(), Semantic::CAR);

        let shape = car.shape();
        assert_eq!(shape.shape_type, Shape::BOUNDING_BOX);
        assert_eq!(shape.dimensions.x, 4.0);
        assert_eq!(shape.dimensions.y, 1.8);
        assert_eq!(shape.dimensions.z, 2.0);
    }

    #[test]
    fn test_pedestrian_constants() {
        let ped = ObjectVariant::Pedestrian;
        assert_eq!(ped.tool_name(), "2D Dummy Pedestrian");
        assert_eq!(ped.shortcut_key(), 'l');
        assert_eq!(ped.semantic_type(), Semantic::PEDESTRIAN);
        assert_eq!(ped.shape(), Shape::bounding_box(0.8, 0.8, 2.0));
        assert_eq!(ped.shape().shape_type, Shape::BOUNDING_BOX);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("car".parse::<ObjectVariant>(), Ok(ObjectVariant::Car));
        assert_eq!("Vehicle".parse::<ObjectVariant>(), Ok(ObjectVariant::Car));
        assert_eq!("pedestrian".parse::<ObjectVariant>(), Ok(ObjectVariant::Pedestrian));
        assert!("truck".parse::<ObjectVariant>().is_err());

        for variant in ObjectVariant::all() {
            assert_eq!(variant.to_string().parse::<ObjectVariant>(), Ok(variant));
        }
    }
}
