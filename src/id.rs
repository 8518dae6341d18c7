//! Code for handling the numbers which identify floors and rooms

macro_rules! define_number_type {
    ($name:ident) => {
        #[derive(
            Clone, Copy, std::hash::Hash, PartialEq, Eq, PartialOrd, Ord, Debug, derive_more::Display,
        )]
        /// A number identifying an item within its parent (e.g. `FloorNumber`, `RoomNumber`)
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(n: u32) -> Self {
                $name(n)
            }
        }

        impl $name {
            /// Get the underlying number
            pub fn value(self) -> u32 {
                self.0
            }
        }
    };
}

define_number_type! {FloorNumber}
define_number_type! {RoomNumber}

impl FloorNumber {
    /// The number of the floor immediately below this one, if there can be one.
    ///
    /// Floor 1 is the ground floor, so it has nothing below it.
    pub fn below(self) -> Option<FloorNumber> {
        (self.0 > 1).then(|| FloorNumber(self.0 - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_below() {
        assert_eq!(FloorNumber(1).below(), None);
        assert_eq!(FloorNumber(2).below(), Some(FloorNumber(1)));
        assert_eq!(FloorNumber(10).below(), Some(FloorNumber(9)));
    }

    #[test]
    fn test_display() {
        assert_eq!(RoomNumber(101).to_string(), "101");
    }
}
