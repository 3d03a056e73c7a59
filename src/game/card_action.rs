// Battle card actions played through the owner's animation

use crate::engine::animation::{AnimationComponent, Animator, OverrideFrame, PlaybackMode};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Default state the owner returns to when an action ends
pub const PLAYER_IDLE: &str = "PLAYER_IDLE";
pub const PLAYER_SHOOTING: &str = "PLAYER_SHOOTING";

/// TwinFang holds the draw pose, snaps through the throw and back
const TWIN_FANG_FRAMES: [OverrideFrame; 9] = [
    OverrideFrame::new(1, 0.05),
    OverrideFrame::new(1, 0.05),
    OverrideFrame::new(1, 0.05),
    OverrideFrame::new(1, 0.05),
    OverrideFrame::new(2, 0.05),
    OverrideFrame::new(3, 0.05),
    OverrideFrame::new(2, 0.05),
    OverrideFrame::new(1, 0.05),
    OverrideFrame::new(1, 0.05),
];

/// Reflect freezes on the first idle frame while the shield is up
const REFLECT_FRAMES: [OverrideFrame; 1] = [OverrideFrame::new(1, 1.3)];

/// Something an action reports back to the battle while it plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    /// The attack frame was reached: spawn the attack now
    Attack,
    /// The action's animation finished
    End,
}

/// A card used by a navi, played as a retimed copy of one of the owner's animations
#[derive(Debug)]
pub struct CardAction {
    name: String,
    /// Animation key the action plays
    state: String,
    /// State the owner returns to afterwards
    return_state: String,
    /// 1-based frame that triggers [`CardEvent::Attack`]
    attack_frame: Option<usize>,
    events: Rc<RefCell<Vec<CardEvent>>>,
    executing: bool,
    finished: bool,
}

impl CardAction {
    /// Create an action playing `state` retimed by `frames`.
    ///
    /// With no override frames, or if the owner lacks `state`, the
    /// authored animation is played as is.
    pub fn new(
        owner: &mut AnimationComponent,
        name: &str,
        state: &str,
        frames: &[OverrideFrame],
    ) -> Self {
        let state = if frames.is_empty() {
            state.to_uppercase()
        } else {
            owner
                .override_animation_frames(state, frames, None)
                .unwrap_or_else(|| state.to_uppercase())
        };

        debug!("Card {} plays animation {}", name, state);

        Self {
            name: name.to_string(),
            state,
            return_state: PLAYER_IDLE.to_string(),
            attack_frame: None,
            events: Rc::new(RefCell::new(Vec::new())),
            executing: false,
            finished: false,
        }
    }

    pub fn twin_fang(owner: &mut AnimationComponent) -> Self {
        Self::new(owner, "TwinFang", PLAYER_SHOOTING, &TWIN_FANG_FRAMES).with_attack_frame(2)
    }

    pub fn reflect(owner: &mut AnimationComponent) -> Self {
        Self::new(owner, "Reflect", PLAYER_IDLE, &REFLECT_FRAMES).with_attack_frame(1)
    }

    pub fn with_attack_frame(mut self, frame: usize) -> Self {
        self.attack_frame = Some(frame);
        self
    }

    pub fn with_return_state(mut self, state: &str) -> Self {
        self.return_state = state.to_uppercase();
        self
    }

    /// Start the action on its owner
    pub fn execute(&mut self, owner: &mut AnimationComponent) {
        info!("Executing card {}", self.name);

        let events = self.events.clone();
        let return_state = self.return_state.clone();
        owner.set_animation_then(&self.state, PlaybackMode::NONE, move |a: &mut Animator| {
            events.borrow_mut().push(CardEvent::End);
            a.set_animation(&return_state).with_mode(PlaybackMode::LOOP);
        });

        if let Some(frame) = self.attack_frame {
            let events = self.events.clone();
            owner.add_callback(
                frame,
                move |_: &mut Animator| events.borrow_mut().push(CardEvent::Attack),
                true,
            );
        }

        self.executing = true;
        self.finished = false;
    }

    /// Drain the events raised since the last poll
    pub fn poll_events(&mut self) -> Vec<CardEvent> {
        let events = std::mem::take(&mut *self.events.borrow_mut());

        if events.contains(&CardEvent::End) {
            self.executing = false;
            self.finished = true;
        }

        events
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Animation key the action plays
    pub fn animation_state(&self) -> &str {
        &self.state
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
