mod events;
mod world;

pub use events::TickEvents;
pub use world::{ReconcileReport, World};
