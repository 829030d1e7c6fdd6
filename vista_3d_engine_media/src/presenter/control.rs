/// Control presenter: clickable 1-of-N UI controls.
///
/// A control renders one of several sub-presenters and switches between
/// them on input. Three hit-testing styles exist: `toggle` flips between
/// two states on any click, `grid` maps the click position into a
/// column/row cell, `map` looks the clicked pixel's palette index up in
/// an allow-list. Style and geometry come from the action's extra data:
///
/// ```text
/// style:toggle
/// style:grid:<columns>,<rows>
/// style:map:<index>,<index>,...
/// ```

use vista_3d_engine::error::Result;
use vista_3d_engine::texture::Image;
use vista_3d_engine::{engine_err, engine_warn};

use crate::action::Action;

use super::events::EngineEvent;
use super::presenter::{presenter_for_action, Presenter, PresenterContext, PresenterCore, TickleState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlStyle {
    Toggle,
    Grid { columns: i16, rows: i16 },
    Map { allowed: Vec<i16> },
}

pub struct ControlPresenter {
    core: PresenterCore,
    style: ControlStyle,
    /// Screen rectangle of the control: x, y, width, height
    rect: (i32, i32, i32, i32),
    selected: i16,
    control_enabled: bool,
    /// One sub-presenter per selectable state
    children: Vec<Box<dyn Presenter>>,
}

impl ControlPresenter {
    pub fn new() -> Self {
        Self {
            core: PresenterCore::new(),
            style: ControlStyle::Toggle,
            rect: (0, 0, 0, 0),
            selected: 0,
            control_enabled: true,
            children: Vec::new(),
        }
    }

    pub fn style(&self) -> &ControlStyle {
        &self.style
    }

    pub fn selected(&self) -> i16 {
        self.selected
    }

    pub fn set_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.rect = (x, y, width, height);
    }

    /// Input-driven enable, separate from the presenter enable bit
    /// (a disabled control ignores clicks but keeps presenting).
    pub fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
    }

    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Enabled flag of sub-presenter `index`.
    pub fn child_enabled(&self, index: usize) -> Option<bool> {
        self.children.get(index).map(|child| child.is_enabled())
    }

    /// Hit-test a click and, on a hit, switch the selected state,
    /// notify the host and re-enable the matching sub-presenter.
    ///
    /// `image` supplies pixel data for `map` style controls.
    pub fn handle_click(
        &mut self,
        x: i32,
        y: i32,
        image: Option<&Image>,
        ctx: &mut PresenterContext<'_>,
    ) -> bool {
        if !self.control_enabled {
            return false;
        }

        let hit = match &self.style {
            ControlStyle::Toggle => Some(if self.selected == 0 { 1 } else { 0 }),
            ControlStyle::Grid { columns, rows } => self.grid_hit(x, y, *columns, *rows),
            ControlStyle::Map { allowed } => map_hit(x, y, allowed, image),
        };

        match hit {
            Some(state) => {
                self.select_state(state, ctx);
                true
            }
            None => false,
        }
    }

    /// Switch to `state`: notify the host and flip sub-presenter
    /// enables so only the selected one runs.
    pub fn select_state(&mut self, state: i16, ctx: &mut PresenterContext<'_>) {
        self.selected = state;
        let object_id = self.core.action().map(|action| action.core.object_id).unwrap_or(0);
        ctx.events.push(EngineEvent::ControlClicked { object_id, selected: state });

        for (index, child) in self.children.iter_mut().enumerate() {
            child.enable(index as i16 == state);
        }
    }

    fn grid_hit(&self, x: i32, y: i32, columns: i16, rows: i16) -> Option<i16> {
        let (rect_x, rect_y, width, height) = self.rect;
        if width <= 0 || height <= 0 || columns <= 0 || rows <= 0 {
            return None;
        }
        let local_x = x - rect_x;
        let local_y = y - rect_y;
        if local_x < 0 || local_y < 0 || local_x >= width || local_y >= height {
            return None;
        }
        let column = (local_x * columns as i32) / width;
        let row = (local_y * rows as i32) / height;
        Some((row * columns as i32 + column) as i16)
    }
}

fn map_hit(x: i32, y: i32, allowed: &[i16], image: Option<&Image>) -> Option<i16> {
    let image = image?;
    if x < 0 || y < 0 {
        return None;
    }
    let index = image.pixel(x as u32, y as u32)? as i16;
    allowed.contains(&index).then_some(index)
}

impl Default for ControlPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ControlPresenter {
    fn core(&self) -> &PresenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PresenterCore {
        &mut self.core
    }

    fn start_action(&mut self, action: Action) -> Result<()> {
        let mut children = Vec::with_capacity(action.children().len());
        for child_action in action.children() {
            let mut child = presenter_for_action(child_action)?;
            // Sub-presenters idle until their state is selected
            child.disarm();
            child.enable(false);
            children.push(child);
        }
        if let Some(first) = children.first_mut() {
            first.enable(true);
        }

        self.children = children;
        self.selected = 0;
        self.set_action(action);
        self.arm();
        Ok(())
    }

    fn parse_extra(&mut self) -> Result<()> {
        let extra = match self.core.action() {
            Some(action) => action.core.extra.clone(),
            None => return Ok(()),
        };
        let text = std::str::from_utf8(&extra).map_err(|_| {
            engine_err!(InvalidParameters, "vista3d::ControlPresenter",
                "extra data is not valid utf-8")
        })?;

        let mut parts = text.splitn(3, ':');
        if parts.next() != Some("style") {
            return Ok(());
        }
        let mode = parts.next().unwrap_or("");
        let params = parts.next().unwrap_or("");

        match mode {
            "toggle" => self.style = ControlStyle::Toggle,
            "grid" => {
                let mut numbers = params.split(',').filter_map(|n| n.trim().parse::<i16>().ok());
                match (numbers.next(), numbers.next()) {
                    (Some(columns), Some(rows)) => {
                        self.style = ControlStyle::Grid { columns, rows };
                    }
                    _ => {
                        engine_warn!("vista3d::ControlPresenter",
                            "grid style without dimensions: '{}'", text);
                    }
                }
            }
            "map" => {
                let allowed: Vec<i16> =
                    params.split(',').filter_map(|n| n.trim().parse().ok()).collect();
                self.style = ControlStyle::Map { allowed };
            }
            other => {
                engine_warn!("vista3d::ControlPresenter", "unknown control style '{}'", other);
            }
        }
        Ok(())
    }

    /// Controls sit in streaming while alive; they advance on input,
    /// not on time.
    fn streaming_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        for child in &mut self.children {
            child.tickle(ctx)?;
        }
        Ok(())
    }

    fn repeating_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Tickle-state queries follow the active sub-presenter.
    fn has_tickle_state_passed(&self, state: TickleState) -> bool {
        match self.children.get(self.selected as usize) {
            Some(child) => child.has_tickle_state_passed(state),
            None => self.state().has_passed(state),
        }
    }

    fn enable(&mut self, enabled: bool) {
        self.core_mut().enabled = enabled;
        self.control_enabled = enabled;
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
