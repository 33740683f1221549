//! The standard model registry.

use crate::{Carbon, LineOfSight, Proximity};
use flowscape_model::{Dispatcher, FlowModelKind};

/// A dispatcher with every supported model kind registered to its
/// reference implementation, each with default parameters.
pub fn standard_dispatcher() -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(FlowModelKind::Proximity, Box::new(Proximity::default()));
    dispatcher.register(FlowModelKind::LineOfSight, Box::new(LineOfSight::default()));
    dispatcher.register(FlowModelKind::Carbon, Box::new(Carbon::new()));
    dispatcher
}
