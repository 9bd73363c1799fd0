//! Drawing and presentation capabilities
//!
//! Colors are CSS color strings. Drawing coordinates are logical; the surface applies
//! the uniform scale given to [`DrawSurface::configure`].

/// Canvas primitives
pub trait DrawSurface {
    /// Size the canvas to `width × height` logical units at `scale` pixels per unit
    fn configure(&mut self, width: f32, height: f32, scale: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str);
    fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: &str,
        line_width: f32,
    );
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: &str);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, width: f32);
}

/// Text readout, addressed by id
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: &'static str,
    pub text: &'static str,
}

/// Range input with a readout label next to it
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub id: &'static str,
    pub caption: &'static str,
    pub min: i32,
    pub max: i32,
    pub value: i32,
    /// Label id showing the current value
    pub readout: Label,
}

/// Declarative description of a game's panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub title: &'static str,
    pub labels: Vec<Label>,
    pub sliders: Vec<Slider>,
    pub buttons: Vec<Button>,
    /// Show a status line under the canvas
    pub status: bool,
    pub hint: Option<&'static str>,
}

impl Layout {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    pub fn label(mut self, id: &'static str, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            id,
            text: text.into(),
        });
        self
    }

    pub fn button(mut self, id: &'static str, text: &'static str) -> Self {
        self.buttons.push(Button { id, text });
        self
    }

    pub fn slider(mut self, slider: Slider) -> Self {
        self.sliders.push(slider);
        self
    }

    pub fn with_status(mut self) -> Self {
        self.status = true;
        self
    }

    pub fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Panel and text output
pub trait Presentation {
    /// Replace the display region with `layout`
    fn mount(&mut self, layout: &Layout);
    /// Empty the display region
    fn clear(&mut self);
    fn set_status(&mut self, text: &str);
    fn set_label(&mut self, id: &str, text: &str);
    fn set_button_text(&mut self, id: &str, text: &str);
    /// Transient notice, hidden again after `duration_ms`
    fn toast(&mut self, message: &str, duration_ms: u32);
}
