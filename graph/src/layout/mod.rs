pub mod topology;
pub mod generation;
pub mod sequencer;
pub mod lanes;
pub mod splice;
pub mod pass;

pub use topology::{ChildrenMap, Topology};
pub use generation::Generations;
pub use sequencer::sequence;
pub use lanes::{LaneAllocator, LaneAssignment, LaneIdx};
pub use splice::splice;
pub use pass::{layout, Layout, LayoutContext};
