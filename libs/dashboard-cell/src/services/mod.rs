pub mod controller;
pub mod join;
pub mod mutation;
pub mod normalizer;
pub mod table;
pub mod view_state;

pub use controller::{DashboardController, DashboardSnapshot, TransitionOutcome};
pub use table::{Column, RowAction, TableRow, TableView};
pub use view_state::{Action, DashboardState, Effect, Loaded, Ticket};
