use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

macro_rules! dense_id {
    ($name:ident) => {
        #[derive(
            Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(i: usize) -> Self {
                $name(i as u32)
            }
        }
    };
}

dense_id!(NodeId);
dense_id!(SegmentId);
