use super::*;
use crate::platform_layer::{
    dpi::DpiScale,
    error::PlatformError,
    event_bus::EventBus,
    styling_primitives::{Color, TooltipPalette},
    types::{
        ControlHandle, ControlRole, DisplayEvent, FrameOperations, InfoBarPlatform, Point,
        Rect, RelayedMessage, ThemeOperations, TooltipOperations, TooltipSettings, TooltipStyle,
    },
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/*
 * Unit tests for `InfoBar`. The bar is driven through mock implementations of
 * `InfoBarPlatform`, `TooltipOperations`, `FrameOperations` and
 * `ThemeOperations`; the mocks share their recorded state with the test
 * through `Rc<RefCell<..>>` so it can be inspected after the platform has
 * been moved into the bar.
 */

const CHAR_WIDTH_PX: i32 = 7;
const THEME_BORDER: Color = Color::rgb(0x20, 0x20, 0x20);

// --- MockTooltip ---

#[derive(Debug, Clone, PartialEq, Eq)]
enum TooltipCall {
    Add(ControlHandle, String),
    Update(ControlHandle, String),
    Delete(ControlHandle),
    Relay(u32),
}

struct MockTooltip {
    style: TooltipStyle,
    tips: HashMap<ControlHandle, String>,
    calls: Rc<RefCell<Vec<TooltipCall>>>,
    fail_add: bool,
}

impl TooltipOperations for MockTooltip {
    fn style(&self) -> TooltipStyle {
        self.style
    }
    fn add_tool(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()> {
        if self.fail_add {
            return Err(PlatformError::OperationFailed("mock add_tool failure".into()));
        }
        self.calls
            .borrow_mut()
            .push(TooltipCall::Add(control, text.to_string()));
        self.tips.insert(control, text.to_string());
        Ok(())
    }
    fn update_tip_text(&mut self, control: ControlHandle, text: &str) {
        self.calls
            .borrow_mut()
            .push(TooltipCall::Update(control, text.to_string()));
        self.tips.insert(control, text.to_string());
    }
    fn del_tool(&mut self, control: ControlHandle) {
        self.calls.borrow_mut().push(TooltipCall::Delete(control));
        self.tips.remove(&control);
    }
    fn relay_event(&mut self, message: &RelayedMessage) {
        self.calls
            .borrow_mut()
            .push(TooltipCall::Relay(message.message));
    }
    fn tip_text(&self, control: ControlHandle) -> Option<&str> {
        self.tips.get(&control).map(String::as_str)
    }
    fn tool_count(&self) -> usize {
        self.tips.len()
    }
}

// --- MockPlatform ---

#[derive(Debug, Clone)]
struct MockControl {
    role: ControlRole,
    text: String,
    rect: Rect,
}

#[derive(Default)]
struct MockPlatformState {
    next_handle: u64,
    controls: HashMap<ControlHandle, MockControl>,
    creation_order: Vec<ControlHandle>,
    destroyed: Vec<ControlHandle>,
    parent_width: i32,
    attached: bool,
    fail_attach: bool,
    fail_create_role: Option<ControlRole>,
    fail_tooltip_add: bool,
    unmeasurable_labels: HashSet<String>,
    text_updates: usize,
    font_log: Vec<(ControlHandle, DpiScale)>,
    font_dpi: HashMap<ControlHandle, DpiScale>,
    invalidations: usize,
    immediate_repaints: usize,
    created_tooltip: Option<(TooltipStyle, TooltipSettings)>,
    screen_origin: Point,
}

impl MockPlatformState {
    fn live_controls(&self, role: ControlRole) -> usize {
        self.controls.values().filter(|c| c.role == role).count()
    }
}

struct MockPlatform {
    state: Rc<RefCell<MockPlatformState>>,
    tooltip_calls: Rc<RefCell<Vec<TooltipCall>>>,
}

impl InfoBarPlatform for MockPlatform {
    fn attach_bar(&mut self) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_attach {
            return Err(PlatformError::InitializationFailed("mock attach failure".into()));
        }
        state.attached = true;
        Ok(())
    }

    fn create_text_control(
        &mut self,
        role: ControlRole,
        text: &str,
    ) -> PlatformResult<ControlHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_create_role == Some(role) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "mock {role:?} failure"
            )));
        }
        state.next_handle += 1;
        let handle = ControlHandle(state.next_handle);
        state.controls.insert(
            handle,
            MockControl {
                role,
                text: text.to_string(),
                rect: Rect::default(),
            },
        );
        state.creation_order.push(handle);
        Ok(handle)
    }

    fn destroy_control(&mut self, control: ControlHandle) {
        let mut state = self.state.borrow_mut();
        if state.controls.remove(&control).is_some() {
            state.destroyed.push(control);
        }
    }

    fn set_control_text(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.text_updates += 1;
        match state.controls.get_mut(&control) {
            Some(c) => {
                c.text = text.to_string();
                Ok(())
            }
            None => Err(PlatformError::InvalidHandle(format!("{control:?}"))),
        }
    }

    // Text is measured with the control's current font, which starts at 96 DPI.
    fn measure_text_width(&self, control: ControlHandle, text: &str) -> Option<i32> {
        let state = self.state.borrow();
        if state.unmeasurable_labels.contains(text) {
            return None;
        }
        let font_dpi = state.font_dpi.get(&control).copied().unwrap_or_default();
        Some(font_dpi.scale_x(text.chars().count() as i32 * CHAR_WIDTH_PX))
    }

    fn move_control(&mut self, control: ControlHandle, rect: Rect) {
        if let Some(c) = self.state.borrow_mut().controls.get_mut(&control) {
            c.rect = rect;
        }
    }

    fn control_rect(&self, control: ControlHandle) -> Option<Rect> {
        self.state.borrow().controls.get(&control).map(|c| c.rect)
    }

    fn scale_control_font(&mut self, control: ControlHandle, dpi: DpiScale) {
        let mut state = self.state.borrow_mut();
        state.font_log.push((control, dpi));
        state.font_dpi.insert(control, dpi);
    }

    fn parent_client_rect(&self) -> Option<Rect> {
        Some(Rect::new(0, 0, self.state.borrow().parent_width, 300))
    }

    fn bar_client_rect(&self) -> Rect {
        Rect::new(0, 0, self.state.borrow().parent_width, 40)
    }

    fn client_to_screen(&self, point: Point) -> Point {
        let origin = self.state.borrow().screen_origin;
        Point {
            x: point.x + origin.x,
            y: point.y + origin.y,
        }
    }

    fn invalidate(&mut self) {
        self.state.borrow_mut().invalidations += 1;
    }

    fn repaint_now(&mut self) {
        self.state.borrow_mut().immediate_repaints += 1;
    }

    fn create_tooltip(
        &mut self,
        style: TooltipStyle,
        settings: TooltipSettings,
    ) -> PlatformResult<Box<dyn TooltipOperations>> {
        let mut state = self.state.borrow_mut();
        state.created_tooltip = Some((style, settings));
        Ok(Box::new(MockTooltip {
            style,
            tips: HashMap::new(),
            calls: Rc::clone(&self.tooltip_calls),
            fail_add: state.fail_tooltip_add,
        }))
    }
}

// --- MockFrame / MockTheme ---

struct MockFrame {
    fullscreen: Cell<bool>,
    last_bar: Cell<bool>,
    dpi: Cell<DpiScale>,
    drags: RefCell<Vec<Point>>,
}

impl MockFrame {
    fn new() -> Self {
        MockFrame {
            fullscreen: Cell::new(false),
            last_bar: Cell::new(true),
            dpi: Cell::new(DpiScale::default()),
            drags: RefCell::new(Vec::new()),
        }
    }
}

impl FrameOperations for MockFrame {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }
    fn is_last_bar(&self) -> bool {
        self.last_bar.get()
    }
    fn dpi(&self) -> DpiScale {
        self.dpi.get()
    }
    fn begin_caption_drag(&self, screen_point: Point) {
        self.drags.borrow_mut().push(screen_point);
    }
}

struct MockTheme {
    active: bool,
}

impl ThemeOperations for MockTheme {
    fn is_theme_active(&self) -> bool {
        self.active
    }
    fn no_border_color(&self) -> Color {
        THEME_BORDER
    }
    fn tooltip_palette(&self) -> TooltipPalette {
        TooltipPalette {
            background: Color::rgb(0x2b, 0x2b, 0x2b),
            text: Color::rgb(0xe0, 0xe0, 0xe0),
        }
    }
}

// --- Fixture ---

struct Fixture {
    bar: Rc<RefCell<InfoBar<MockPlatform>>>,
    state: Rc<RefCell<MockPlatformState>>,
    tooltip_calls: Rc<RefCell<Vec<TooltipCall>>>,
    frame: Rc<MockFrame>,
    bus: EventBus<DisplayEvent>,
}

fn setup_unattached(theme_active: bool) -> Fixture {
    let state = Rc::new(RefCell::new(MockPlatformState {
        parent_width: 500,
        ..Default::default()
    }));
    let tooltip_calls = Rc::new(RefCell::new(Vec::new()));
    let platform = MockPlatform {
        state: Rc::clone(&state),
        tooltip_calls: Rc::clone(&tooltip_calls),
    };
    let frame = Rc::new(MockFrame::new());
    let theme = Rc::new(MockTheme {
        active: theme_active,
    });
    let bus = EventBus::new();
    let bar = InfoBar::new(
        platform,
        Rc::clone(&frame) as Rc<dyn FrameOperations>,
        theme as Rc<dyn ThemeOperations>,
        &bus,
        InfoBarConfig::default(),
    );
    Fixture {
        bar,
        state,
        tooltip_calls,
        frame,
        bus,
    }
}

fn setup_bar() -> Fixture {
    let fixture = setup_unattached(false);
    fixture
        .bar
        .borrow_mut()
        .create()
        .expect("mock create should succeed");
    fixture
}

fn control_rects(fixture: &Fixture, label: &str) -> (Rect, Rect) {
    let bar = fixture.bar.borrow();
    let index = bar
        .labels()
        .position(|l| l == label)
        .expect("label should exist");
    let handles: Vec<ControlHandle> = {
        let state = fixture.state.borrow();
        state
            .creation_order
            .iter()
            .copied()
            .filter(|h| state.controls.contains_key(h))
            .collect()
    };
    let state = fixture.state.borrow();
    (
        state.controls[&handles[index * 2]].rect,
        state.controls[&handles[index * 2 + 1]].rect,
    )
}

fn relayed(message: u32) -> RelayedMessage {
    RelayedMessage {
        window: 0x1234,
        message,
        wparam: 0,
        lparam: 0,
        time: 0,
        point: Point::default(),
    }
}

// --- Tests ---

#[test]
fn test_set_line_distinct_labels_counts_lines() {
    let f = setup_bar();
    let mut bar = f.bar.borrow_mut();

    assert!(bar.set_line("File", "movie.mkv").unwrap());
    assert!(bar.set_line("Resolution", "1920x1080").unwrap());
    assert!(bar.set_line("Frame rate", "23.976").unwrap());

    assert_eq!(bar.line_count(), 3);
    assert_eq!(
        bar.labels().collect::<Vec<_>>(),
        vec!["File", "Resolution", "Frame rate"]
    );
    assert_eq!(bar.get_line("Resolution"), "1920x1080");
    assert_eq!(f.state.borrow().live_controls(ControlRole::Label), 3);
    assert_eq!(f.state.borrow().live_controls(ControlRole::Value), 3);
    assert_eq!(bar.tooltip().map(|t| t.tool_count()), Some(3));
}

#[test]
fn test_set_line_empty_value_removes_line() {
    let f = setup_bar();
    let mut bar = f.bar.borrow_mut();
    bar.set_line("Audio", "AAC 2.0").unwrap();

    let structural = bar.set_line("Audio", "").unwrap();

    assert!(structural);
    assert_eq!(bar.line_count(), 0);
    assert_eq!(bar.get_line("Audio"), "");
    assert_eq!(f.state.borrow().destroyed.len(), 2);
    assert_eq!(bar.tooltip().map(|t| t.tool_count()), Some(0));
}

#[test]
fn test_set_line_whitespace_only_value_removes_and_trims() {
    let f = setup_bar();
    let mut bar = f.bar.borrow_mut();

    assert!(bar.set_line("Video", "  H.264  ").unwrap());
    assert_eq!(bar.get_line("Video"), "H.264");

    assert!(bar.set_line("Video", " \t ").unwrap());
    assert!(bar.is_empty());

    // Removing a line that does not exist reports no structural change.
    assert!(!bar.set_line("Missing", "").unwrap());
}

#[test]
fn test_set_line_identical_value_returns_false_and_skips_tooltip() {
    let f = setup_bar();
    let mut bar = f.bar.borrow_mut();
    bar.set_line("Codec", "HEVC").unwrap();
    let calls_before = f.tooltip_calls.borrow().len();
    let updates_before = f.state.borrow().text_updates;

    assert!(!bar.set_line("Codec", "HEVC").unwrap());
    assert!(!bar.set_line("Codec", " HEVC ").unwrap());

    assert_eq!(f.tooltip_calls.borrow().len(), calls_before);
    assert_eq!(f.state.borrow().text_updates, updates_before);
}

#[test]
fn test_set_line_changed_value_updates_in_place() {
    let f = setup_bar();
    let mut bar = f.bar.borrow_mut();
    bar.set_line("A", "1").unwrap();
    bar.set_line("B", "2").unwrap();
    bar.set_line("C", "3").unwrap();
    let value_b = bar.value_control("B").unwrap();

    assert!(!bar.set_line("B", "two").unwrap());

    assert_eq!(bar.line_count(), 3);
    assert_eq!(bar.labels().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(bar.get_line("B"), "two");
    assert_eq!(bar.value_control("B"), Some(value_b));
    assert_eq!(f.state.borrow().controls[&value_b].text, "two");
    assert_eq!(bar.tooltip().and_then(|t| t.tip_text(value_b)), Some("two"));
    assert_eq!(
        f.tooltip_calls.borrow().last(),
        Some(&TooltipCall::Update(value_b, "two".to_string()))
    );
}

#[test]
fn test_get_line_missing_returns_empty() {
    let f = setup_bar();
    assert_eq!(f.bar.borrow().get_line("Nothing"), "");
}

#[test]
fn test_relayout_is_idempotent() {
    let f = setup_bar();
    {
        let mut bar = f.bar.borrow_mut();
        bar.set_line("Title", "Big Buck Bunny").unwrap();
        bar.set_line("Subtitles", "English").unwrap();
    }
    let first_layout = f.bar.borrow().layout().clone();
    let first_rects = control_rects(&f, "Subtitles");

    f.bar.borrow_mut().relayout();
    f.bar.borrow_mut().relayout();

    assert_eq!(*f.bar.borrow().layout(), first_layout);
    assert_eq!(control_rects(&f, "Subtitles"), first_rects);
}

#[test]
fn test_remove_middle_line_shifts_later_lines_up() {
    let f = setup_bar();
    {
        let mut bar = f.bar.borrow_mut();
        bar.set_line("One", "1").unwrap();
        bar.set_line("Two", "2").unwrap();
        bar.set_line("Three", "3").unwrap();
    }
    let (label_before, value_before) = control_rects(&f, "Three");
    let row_height = f.bar.borrow().layout().row_height;

    assert!(f.bar.borrow_mut().remove_line("Two"));

    let (label_after, value_after) = control_rects(&f, "Three");
    assert_eq!(label_after.top, label_before.top - row_height);
    assert_eq!(value_after.top, value_before.top - row_height);
    assert_eq!(
        f.bar.borrow().labels().collect::<Vec<_>>(),
        vec!["One", "Three"]
    );
    assert!(!f.bar.borrow_mut().remove_line("Two"));
}

#[test]
fn test_first_row_positions_match_metrics() {
    let f = setup_bar();
    f.bar.borrow_mut().set_line("Size", "1.2 GB").unwrap();

    let (label, value) = control_rects(&f, "Size");

    assert_eq!(label, Rect::new(1, 2, 91, 19));
    assert_eq!(value, Rect::new(110, 2, 499, 19));
}

#[test]
fn test_long_label_widens_column() {
    let f = setup_bar();
    let long_label = "A rather long label describing the stream";
    {
        let mut bar = f.bar.borrow_mut();
        bar.set_line("Short", "x").unwrap();
        bar.set_line(long_label, "y").unwrap();
    }
    let measured = long_label.chars().count() as i32 * CHAR_WIDTH_PX;

    let bar = f.bar.borrow();
    assert!(bar.layout().column_width >= measured);
    assert_eq!(bar.layout().column_width, measured);
    let (_, short_value) = control_rects(&f, "Short");
    assert_eq!(short_value.left, measured + 10);
}

#[test]
fn test_unmeasurable_label_falls_back_to_minimum_width() {
    let f = setup_unattached(false);
    f.state
        .borrow_mut()
        .unmeasurable_labels
        .insert("A label much longer than the minimum column".to_string());
    f.bar.borrow_mut().create().unwrap();

    f.bar
        .borrow_mut()
        .set_line("A label much longer than the minimum column", "v")
        .unwrap();

    assert_eq!(f.bar.borrow().layout().column_width, 100);
}

#[test]
fn test_remove_all_lines_on_empty_bar() {
    let f = setup_bar();
    f.bar.borrow_mut().remove_all_lines();
    assert_eq!(f.bar.borrow().line_count(), 0);
    assert_eq!(f.state.borrow().immediate_repaints, 1);
}

#[test]
fn test_remove_all_lines_destroys_controls_and_tools() {
    let f = setup_bar();
    {
        let mut bar = f.bar.borrow_mut();
        bar.set_line("A", "1").unwrap();
        bar.set_line("B", "2").unwrap();
        bar.remove_all_lines();
    }

    let state = f.state.borrow();
    assert!(state.controls.is_empty());
    assert_eq!(state.destroyed.len(), 4);
    assert_eq!(state.immediate_repaints, 1);
    let deletes = f
        .tooltip_calls
        .borrow()
        .iter()
        .filter(|c| matches!(c, TooltipCall::Delete(_)))
        .count();
    assert_eq!(deletes, 2);
    assert_eq!(f.bar.borrow().tooltip().map(|t| t.tool_count()), Some(0));
    assert_eq!(f.bar.borrow().fixed_layout_size().height, 0);
}

#[test]
fn test_set_line_before_create_fails() {
    let f = setup_unattached(false);
    let result = f.bar.borrow_mut().set_line("Early", "value");

    assert!(matches!(result, Err(PlatformError::InvalidHandle(_))));
    assert!(f.state.borrow().controls.is_empty());
    assert!(!f.bar.borrow().is_created());
}

#[test]
fn test_create_failure_propagates_and_leaves_bar_uncreated() {
    let f = setup_unattached(false);
    f.state.borrow_mut().fail_attach = true;

    let result = f.bar.borrow_mut().create();

    assert!(matches!(result, Err(PlatformError::InitializationFailed(_))));
    assert!(!f.bar.borrow().is_created());
    assert!(f.state.borrow().created_tooltip.is_none());
}

#[test]
fn test_value_control_creation_failure_leaves_state_unchanged() {
    let f = setup_bar();
    f.bar.borrow_mut().set_line("Kept", "yes").unwrap();
    f.state.borrow_mut().fail_create_role = Some(ControlRole::Value);

    let result = f.bar.borrow_mut().set_line("Broken", "value");

    assert!(matches!(result, Err(PlatformError::ControlCreationFailed(_))));
    let bar = f.bar.borrow();
    assert_eq!(bar.line_count(), 1);
    assert_eq!(bar.get_line("Broken"), "");
    let state = f.state.borrow();
    assert_eq!(state.controls.len(), 2);
    assert_eq!(state.destroyed.len(), 1);
}

#[test]
fn test_tooltip_registration_failure_destroys_both_controls() {
    let f = setup_unattached(false);
    f.state.borrow_mut().fail_tooltip_add = true;
    f.bar.borrow_mut().create().unwrap();

    let result = f.bar.borrow_mut().set_line("Line", "value");

    assert!(matches!(result, Err(PlatformError::OperationFailed(_))));
    assert!(f.bar.borrow().is_empty());
    let state = f.state.borrow();
    assert!(state.controls.is_empty());
    assert_eq!(state.destroyed.len(), 2);
}

#[test]
fn test_create_twice_is_ignored() {
    let f = setup_bar();
    f.state.borrow_mut().created_tooltip = None;

    f.bar.borrow_mut().create().unwrap();

    assert!(f.state.borrow().created_tooltip.is_none());
}

#[test]
fn test_create_chooses_plain_tooltip_without_theme() {
    let f = setup_bar();
    let (style, settings) = f.state.borrow().created_tooltip.unwrap();

    assert_eq!(style, TooltipStyle::Plain);
    assert_eq!(settings.max_width_px, 500);
    assert_eq!(settings.auto_pop_ms, 10_000);
    assert!(settings.palette.is_none());
    assert_eq!(
        f.bar.borrow().tooltip().map(|t| t.style()),
        Some(TooltipStyle::Plain)
    );
}

#[test]
fn test_create_chooses_themed_tooltip_with_scaled_width() {
    let f = setup_unattached(true);
    f.frame.dpi.set(DpiScale::uniform(144));
    f.bar.borrow_mut().create().unwrap();

    let (style, settings) = f.state.borrow().created_tooltip.unwrap();
    assert_eq!(style, TooltipStyle::Themed);
    assert_eq!(settings.max_width_px, 750);
    assert!(settings.palette.is_some());
}

#[test]
fn test_drop_unsubscribes_and_destroys_controls() {
    let f = setup_bar();
    f.bar.borrow_mut().set_line("A", "1").unwrap();
    f.bar.borrow_mut().set_line("B", "2").unwrap();
    assert_eq!(f.bus.subscriber_count(), 1);

    let Fixture {
        bar, state, bus, ..
    } = f;
    drop(bar);

    assert_eq!(bus.subscriber_count(), 0);
    assert!(state.borrow().controls.is_empty());
    assert_eq!(state.borrow().destroyed.len(), 4);
    bus.publish(DisplayEvent::DpiChanged);
    assert!(state.borrow().font_log.is_empty());
}

#[test]
fn test_dpi_change_rescales_labels_then_values() {
    let f = setup_bar();
    {
        let mut bar = f.bar.borrow_mut();
        bar.set_line("A", "1").unwrap();
        bar.set_line("B", "2").unwrap();
    }
    let new_dpi = DpiScale::uniform(144);
    f.frame.dpi.set(new_dpi);

    f.bus.publish(DisplayEvent::DpiChanged);

    let state = f.state.borrow();
    let roles: Vec<ControlRole> = state
        .font_log
        .iter()
        .map(|(h, _)| state.controls[h].role)
        .collect();
    assert_eq!(
        roles,
        vec![
            ControlRole::Label,
            ControlRole::Label,
            ControlRole::Value,
            ControlRole::Value
        ]
    );
    assert!(state.font_log.iter().all(|(_, dpi)| *dpi == new_dpi));
}

#[test]
fn test_dpi_change_then_resize_measures_with_rescaled_fonts() {
    let f = setup_bar();
    let long_label = "Audio renderer output format";
    f.bar.borrow_mut().set_line(long_label, "48 kHz").unwrap();
    let column_at_96 = f.bar.borrow().layout().column_width;
    assert_eq!(column_at_96, long_label.len() as i32 * CHAR_WIDTH_PX);

    f.frame.dpi.set(DpiScale::uniform(192));
    f.bus.publish(DisplayEvent::DpiChanged);
    // Rescaling alone keeps the old positions.
    assert_eq!(f.bar.borrow().layout().column_width, column_at_96);

    f.bar.borrow_mut().on_size();

    assert_eq!(f.bar.borrow().layout().column_width, 2 * column_at_96);
    let (label, value) = control_rects(&f, long_label);
    assert_eq!(label.width(), 2 * column_at_96 - 20);
    assert_eq!(value.left, 2 * column_at_96 + 20);
}

#[test]
fn test_dpi_event_while_bar_is_borrowed_is_dropped() {
    let f = setup_bar();
    f.bar.borrow_mut().set_line("A", "1").unwrap();

    {
        let _busy = f.bar.borrow();
        f.bus.publish(DisplayEvent::DpiChanged);
    }

    assert!(f.state.borrow().font_log.is_empty());
}

#[test]
fn test_fixed_layout_size_tracks_lines_and_dpi() {
    let f = setup_bar();
    assert_eq!(
        f.bar.borrow().fixed_layout_size(),
        Size {
            width: 500,
            height: 0
        }
    );

    f.bar.borrow_mut().set_line("A", "1").unwrap();
    f.bar.borrow_mut().set_line("B", "2").unwrap();
    assert_eq!(f.bar.borrow().fixed_layout_size().height, 2 * 17 + 2 * 2);

    f.frame.dpi.set(DpiScale::uniform(192));
    assert_eq!(f.bar.borrow().fixed_layout_size().height, 2 * 34 + 2 * 4);
}

#[test]
fn test_on_size_follows_parent_width_and_invalidates() {
    let f = setup_bar();
    f.bar.borrow_mut().set_line("A", "1").unwrap();
    f.state.borrow_mut().parent_width = 800;

    f.bar.borrow_mut().on_size();

    let (_, value) = control_rects(&f, "A");
    assert_eq!(value.right, 799);
    assert_eq!(f.state.borrow().invalidations, 1);
}

#[test]
fn test_background_plan_bevel_without_theme() {
    let f = setup_bar();
    f.bar.borrow_mut().set_line("A", "1").unwrap();

    let plan = f.bar.borrow().background_plan();

    assert_eq!(plan.border, BorderFill::SystemBevel);
    assert_eq!(plan.border_rect, Rect::new(0, 0, 500, 40));
    assert_eq!(plan.interior, Rect::new(1, 1, 499, 39));
    assert_eq!(
        plan.exclusions,
        vec![Rect::new(1, 2, 91, 19), Rect::new(110, 2, 499, 19)]
    );
}

#[test]
fn test_background_plan_themed_fullscreen() {
    let f = setup_unattached(true);
    f.bar.borrow_mut().create().unwrap();
    f.frame.fullscreen.set(true);

    let plan = f.bar.borrow().background_plan();

    assert_eq!(plan.border, BorderFill::Solid(THEME_BORDER));
    assert_eq!(plan.border_rect, Rect::new(-1, 0, 501, 41));
    assert!(plan.exclusions.is_empty());
}

#[test]
fn test_background_plan_not_last_bar_extends_bottom() {
    let f = setup_bar();
    f.frame.last_bar.set(false);

    let plan = f.bar.borrow().background_plan();

    assert_eq!(plan.border_rect, Rect::new(0, 0, 500, 41));
}

#[test]
fn test_primary_button_down_drags_only_when_windowed() {
    let f = setup_bar();
    f.state.borrow_mut().screen_origin = Point { x: 100, y: 600 };

    assert!(f.bar.borrow().on_primary_button_down(Point { x: 5, y: 7 }));
    f.frame.fullscreen.set(true);
    assert!(!f.bar.borrow().on_primary_button_down(Point { x: 9, y: 9 }));

    assert_eq!(*f.frame.drags.borrow(), vec![Point { x: 105, y: 607 }]);
}

#[test]
fn test_pre_translate_message_reaches_tooltip() {
    let f = setup_bar();
    const WM_MOUSEMOVE: u32 = 0x0200;

    f.bar
        .borrow_mut()
        .pre_translate_message(&relayed(WM_MOUSEMOVE));

    assert_eq!(
        f.tooltip_calls.borrow().last(),
        Some(&TooltipCall::Relay(WM_MOUSEMOVE))
    );
}

#[test]
fn test_pre_translate_message_before_create_is_noop() {
    let f = setup_unattached(false);
    f.bar.borrow_mut().pre_translate_message(&relayed(0x0201));
    assert!(f.tooltip_calls.borrow().is_empty());
}

// Drives the bar with a seeded random sequence of operations and compares it
// against a plain ordered list after every step.
#[test]
fn test_random_operation_sequence_matches_model() {
    let f = setup_bar();
    let mut rng = StdRng::seed_from_u64(0x1ab5_0f_b4);
    let labels = ["File", "Video", "Audio", "Subtitles", "Chapter", "Size"];
    let mut model: Vec<(String, String)> = Vec::new();

    for _ in 0..400 {
        let label = labels[rng.random_range(0..labels.len())];
        let mut bar = f.bar.borrow_mut();
        match rng.random_range(0..10) {
            0 => {
                bar.remove_all_lines();
                model.clear();
            }
            1 | 2 => {
                let removed = bar.remove_line(label);
                let position = model.iter().position(|(l, _)| l == label);
                assert_eq!(removed, position.is_some());
                if let Some(index) = position {
                    model.remove(index);
                }
            }
            _ => {
                let value = format!("v{}", rng.random_range(0..4));
                let structural = bar.set_line(label, &value).unwrap();
                match model.iter_mut().find(|(l, _)| l == label) {
                    Some(entry) => {
                        assert!(!structural);
                        entry.1 = value;
                    }
                    None => {
                        assert!(structural);
                        model.push((label.to_string(), value));
                    }
                }
            }
        }

        assert_eq!(bar.line_count(), model.len());
        assert!(bar.labels().eq(model.iter().map(|(l, _)| l.as_str())));
        for (l, v) in &model {
            assert_eq!(bar.get_line(l), v);
        }
        assert_eq!(bar.tooltip().map(|t| t.tool_count()), Some(model.len()));
        assert_eq!(bar.layout().rows.len(), model.len());
        assert_eq!(f.state.borrow().controls.len(), model.len() * 2);
    }
}
