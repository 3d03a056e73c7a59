// Battle-side users of the animation engine

pub mod card_action;

pub use card_action::{CardAction, CardEvent};
