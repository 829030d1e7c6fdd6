/// Action-control presenter: a leaf that turns an action reference from
/// its extra data into a host request.
///
/// The extra blob carries `action:<script>`; on its starting pass the
/// presenter posts an `ActionRequested` event and completes, skipping
/// the streaming states entirely.

use vista_3d_engine::engine_warn;
use vista_3d_engine::error::Result;

use super::events::EngineEvent;
use super::presenter::{Presenter, PresenterContext, PresenterCore, TickleState};

pub struct ActionControlPresenter {
    core: PresenterCore,
    script: Option<String>,
}

impl ActionControlPresenter {
    pub fn new() -> Self {
        Self { core: PresenterCore::new(), script: None }
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }
}

impl Default for ActionControlPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ActionControlPresenter {
    fn core(&self) -> &PresenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PresenterCore {
        &mut self.core
    }

    fn parse_extra(&mut self) -> Result<()> {
        let extra = match self.core.action() {
            Some(action) => &action.core.extra,
            None => return Ok(()),
        };
        match std::str::from_utf8(extra).ok().and_then(|text| text.strip_prefix("action:")) {
            Some(script) if !script.is_empty() => {
                self.script = Some(script.to_string());
            }
            _ => {
                engine_warn!("vista3d::ActionControlPresenter",
                    "no action reference in extra data");
            }
        }
        Ok(())
    }

    fn starting_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        if let Some(script) = self.script.clone() {
            ctx.events.push(EngineEvent::ActionRequested { script });
        }
        // Zero-duration: straight to done
        self.core.set_state(TickleState::Done);
        Ok(())
    }
}

#[cfg(test)]
#[path = "action_control_tests.rs"]
mod tests;
