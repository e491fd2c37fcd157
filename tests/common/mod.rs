//! Synthetic target application shared by the integration tests.
//!
//! `MockApp` renders a 200x110 form: a striped input field at (10, 10), a
//! checkered search button at (70, 10) and, after a submit, one checkbox glyph
//! per household member along y = 50, 30 px apart.
#![allow(dead_code)]

use screensearch::{InputInjector, Point, ScreenCapture, ScreenSearchError, Screenshot};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

pub const SCREEN_W: u32 = 200;
pub const SCREEN_H: u32 = 110;
pub const BACKGROUND: u8 = 250;
pub const INPUT_AT: (u32, u32) = (10, 10);
pub const BUTTON_AT: (u32, u32) = (70, 10);
pub const MARKER_ROW: u32 = 50;
pub const MARKER_PITCH: u32 = 30;

pub fn checkbox() -> image::GrayImage {
    image::GrayImage::from_fn(10, 10, |x, y| {
        let v = if x == 0 || y == 0 || x == 9 || y == 9 {
            0
        } else if (3..=6).contains(&x) && (3..=6).contains(&y) {
            40
        } else {
            235
        };
        image::Luma([v])
    })
}

pub fn input_field() -> image::GrayImage {
    image::GrayImage::from_fn(40, 12, |x, y| image::Luma([(((x / 3 + y) % 4) * 60) as u8]))
}

pub fn search_button() -> image::GrayImage {
    image::GrayImage::from_fn(24, 12, |x, y| {
        image::Luma([(((x / 4 + y / 4) % 2) * 200 + 20) as u8])
    })
}

pub fn blank(width: u32, height: u32) -> image::GrayImage {
    image::GrayImage::from_pixel(width, height, image::Luma([BACKGROUND]))
}

pub fn paste(dst: &mut image::GrayImage, src: &image::GrayImage, x0: u32, y0: u32) {
    image::imageops::replace(dst, src, x0 as i64, y0 as i64);
}

/// Writes the three standard templates into `dir`.
pub fn write_templates(dir: &Path) {
    input_field().save(dir.join("input_field.png")).unwrap();
    search_button().save(dir.join("search_button.png")).unwrap();
    checkbox().save(dir.join("checkbox.png")).unwrap();
}

/// Renders the form with `members` checkboxes.
pub fn render(members: usize) -> image::GrayImage {
    let mut img = blank(SCREEN_W, SCREEN_H);
    paste(&mut img, &input_field(), INPUT_AT.0, INPUT_AT.1);
    paste(&mut img, &search_button(), BUTTON_AT.0, BUTTON_AT.1);
    for i in 0..members as u32 {
        paste(&mut img, &checkbox(), 10 + MARKER_PITCH * i, MARKER_ROW);
    }
    img
}

fn inside(at: Point, origin: (u32, u32), size: (u32, u32)) -> bool {
    let (x0, y0) = (origin.0 as i32, origin.1 as i32);
    at.x >= x0 && at.y >= y0 && at.x < x0 + size.0 as i32 && at.y < y0 + size.1 as i32
}

/// State of the simulated application.
#[derive(Default)]
pub struct MockApp {
    pub households: HashMap<String, usize>,
    pub field: String,
    pub focused: bool,
    pub selected: bool,
    pub shown: Option<usize>,
    pub captures: usize,
    pub actions: Vec<String>,
    pub fail_typing: bool,
    /// Where the captured window sits on the desktop.
    pub origin: Point,
}

pub type SharedApp = Rc<RefCell<MockApp>>;

pub fn app_with(households: &[(&str, usize)]) -> SharedApp {
    let app = MockApp {
        households: households
            .iter()
            .map(|(id, n)| (id.to_string(), *n))
            .collect(),
        ..MockApp::default()
    };
    Rc::new(RefCell::new(app))
}

pub struct MockCapture(pub SharedApp);

impl ScreenCapture for MockCapture {
    fn capture(&mut self) -> Result<Screenshot, ScreenSearchError> {
        let mut app = self.0.borrow_mut();
        app.captures += 1;
        app.actions.push("capture".into());
        Ok(Screenshot::new(render(app.shown.unwrap_or(0))).with_origin(app.origin))
    }
}

pub struct MockInjector(pub SharedApp);

impl InputInjector for MockInjector {
    fn click(&mut self, at: Point) -> Result<(), ScreenSearchError> {
        let mut app = self.0.borrow_mut();
        let at = Point::new(at.x - app.origin.x, at.y - app.origin.y);
        if inside(at, INPUT_AT, (40, 12)) {
            app.actions.push("click:input".into());
            app.focused = true;
        } else if inside(at, BUTTON_AT, (24, 12)) {
            app.actions.push("click:button".into());
            let shown = app.households.get(&app.field).copied().unwrap_or(0);
            app.shown = Some(shown);
        } else {
            app.actions.push(format!("click:{},{}", at.x, at.y));
            app.focused = false;
        }
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), ScreenSearchError> {
        let mut app = self.0.borrow_mut();
        app.actions.push(format!("key:{key}"));
        if key == "delete" && app.focused && app.selected {
            app.field.clear();
            app.selected = false;
        }
        Ok(())
    }

    fn hotkey(&mut self, keys: &[String]) -> Result<(), ScreenSearchError> {
        let mut app = self.0.borrow_mut();
        app.actions.push(format!("hotkey:{}", keys.join("+")));
        if keys == ["ctrl", "a"] && app.focused {
            app.selected = true;
        }
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), ScreenSearchError> {
        let mut app = self.0.borrow_mut();
        if app.fail_typing {
            return Err(ScreenSearchError::InjectionFailure {
                reason: "keyboard unavailable".into(),
            });
        }
        app.actions.push(format!("type:{text}"));
        if app.focused {
            app.field.push_str(text);
        }
        Ok(())
    }
}
