use cgmath::Vector2;
use parking_lot::Mutex;
use perch::events::KeyCode;
use perch::layout::{JustifyLayout, VerticalLayout};
use perch::{
    bubble_down, Alignment, DrawList, Element, ElementId, ElementTree, EventContext,
    KeyboardEvent, LayoutComponent, MouseEvent, Rect, RegionDispatcher, RegionHandler,
    ScrollComponent, ScrollState, Widget,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Counts clicks and consumes them.
#[derive(Debug)]
struct Button {
    clicks: Arc<AtomicUsize>,
}

impl Button {
    fn new() -> (Button, Arc<AtomicUsize>) {
        let clicks = Arc::new(AtomicUsize::new(0));
        (
            Button {
                clicks: Arc::clone(&clicks),
            },
            clicks,
        )
    }
}

impl Widget for Button {
    fn on_click(&mut self, _: &mut EventContext, _: &MouseEvent) -> bool {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Swallows every mouse event while visible, wherever it is.
#[derive(Debug)]
struct Modal;

impl Widget for Modal {
    fn process_mouse_event(&mut self, cx: &mut EventContext, event: &MouseEvent) -> bool {
        bubble_down(self, cx, event) || cx.is_visible()
    }
}

#[test]
fn modal_blocks_siblings_while_visible() {
    init_logging();

    let (button, clicks) = Button::new();
    let (dismiss, dismissed) = Button::new();
    let modal = Element::new(300., 200., 200., 200.)
        .with_widget(Modal)
        .with_child(Element::new(10., 10., 50., 20.).with_widget(dismiss))
        .hidden();
    let modal_id = modal.id();

    let mut tree = ElementTree::new(
        Element::new(0., 0., 800., 600.)
            .with_child(Element::new(0., 0., 100., 40.).with_widget(button))
            .with_child(modal),
    );

    assert!(tree.process_mouse_event(&MouseEvent::click(10., 10.)));
    assert!(!tree.process_mouse_event(&MouseEvent::click(5000., 5000.)));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);

    tree.set_visible(modal_id, true).unwrap();
    assert!(tree.process_mouse_event(&MouseEvent::click(10., 10.)));
    assert!(tree.process_mouse_event(&MouseEvent::click(5000., 5000.)));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);

    // the modal's own children still work
    assert!(tree.process_mouse_event(&MouseEvent::click(315., 215.)));
    assert_eq!(dismissed.load(Ordering::SeqCst), 1);

    tree.set_visible(modal_id, false).unwrap();
    assert!(tree.process_mouse_event(&MouseEvent::click(10., 10.)));
    assert_eq!(clicks.load(Ordering::SeqCst), 2);
}

#[test]
fn regions_route_before_tree() {
    init_logging();

    let (button, clicks) = Button::new();
    let menu = Element::new(100., 100., 120., 80.);
    let menu_id = menu.id();
    let mut tree = ElementTree::new(
        Element::new(0., 0., 800., 600.)
            .with_child(Element::new(0., 0., 400., 400.).with_widget(button))
            .with_child(menu),
    );

    // clicking inside the menu hides it; the button underneath never hears about it
    let mut regions = RegionDispatcher::new();
    let menu_region = regions.register_region(
        Rect::xywh(100., 100., 120., 80.),
        RegionHandler::new(move |tree: &mut ElementTree, _: &MouseEvent| {
            tree.set_visible(menu_id, false).is_ok()
        }),
        100,
    );

    let dispatch = |tree: &mut ElementTree, event: MouseEvent| {
        regions.dispatch_event(tree, &event) || tree.process_mouse_event(&event)
    };

    assert!(dispatch(&mut tree, MouseEvent::click(150., 150.)));
    assert!(!tree.is_visible(menu_id));
    assert_eq!(clicks.load(Ordering::SeqCst), 0);

    assert!(dispatch(&mut tree, MouseEvent::click(50., 50.)));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);

    regions.set_region_enabled(menu_region, false);
    assert!(!regions.dispatch_event(&mut tree, &MouseEvent::click(150., 150.)));
}

/// Adds a row to its parent list on every click.
#[derive(Debug)]
struct AddRow {
    list: ElementId,
}

impl Widget for AddRow {
    fn on_click(&mut self, cx: &mut EventContext, _: &MouseEvent) -> bool {
        cx.commands()
            .add_child(self.list, Element::new(0., 0., 100., 20.));
        true
    }
}

#[test]
fn handlers_grow_lists_through_commands() {
    init_logging();

    let list = Element::new(0., 0., 100., 100.)
        .with_component(LayoutComponent::new(VerticalLayout::new(5., Alignment::Stretch)))
        .with_component(ScrollComponent::vertical());
    let list_id = list.id();
    let mut tree = ElementTree::new(
        Element::new(0., 0., 400., 400.)
            .with_child(list)
            .with_child(Element::new(200., 0., 50., 50.).with_widget(AddRow { list: list_id })),
    );

    for _ in 0..6 {
        assert!(tree.process_mouse_event(&MouseEvent::click(210., 10.)));
    }
    tree.update(0.);

    let rows = tree.children(list_id).to_vec();
    assert_eq!(rows.len(), 6);
    assert_eq!(tree.bounds(rows[5]).map(|b| b.y()), Some(125.));

    // 6 rows of 20 with 5 between them
    let max_scroll = tree
        .component::<ScrollComponent>(list_id)
        .map(|s| s.state().max_scroll_y());
    assert_eq!(max_scroll, Some(45.));
}

/// Takes focus when clicked and records keys.
#[derive(Debug)]
struct TextField {
    keys: Arc<Mutex<Vec<KeyCode>>>,
}

impl Widget for TextField {
    fn on_click(&mut self, cx: &mut EventContext, _: &MouseEvent) -> bool {
        cx.request_focus();
        true
    }

    fn on_key_press(&mut self, _: &mut EventContext, event: &KeyboardEvent) -> bool {
        self.keys.lock().push(event.key);
        true
    }
}

#[test]
fn click_to_focus_then_type() {
    init_logging();

    let keys = Arc::new(Mutex::new(Vec::new()));
    let field = Element::new(10., 10., 200., 30.).with_widget(TextField {
        keys: Arc::clone(&keys),
    });
    let field_id = field.id();
    let mut tree = ElementTree::new(Element::new(0., 0., 400., 400.).with_child(field));

    assert!(!tree.process_key_event(&KeyboardEvent::pressed(KeyCode::H)));
    assert!(tree.process_mouse_event(&MouseEvent::click(20., 20.)));
    assert_eq!(tree.focused(), Some(field_id));

    assert!(tree.process_key_event(&KeyboardEvent::pressed(KeyCode::H)));
    assert!(tree.process_key_event(&KeyboardEvent::pressed(KeyCode::I)));
    assert_eq!(*keys.lock(), vec![KeyCode::H, KeyCode::I]);

    tree.set_focus(None).unwrap();
    assert!(!tree.process_key_event(&KeyboardEvent::pressed(KeyCode::X)));
}

#[test]
fn nested_absolute_bounds() {
    let leaf = Element::new(5., 6., 1., 1.);
    let leaf_id = leaf.id();
    let tree = ElementTree::new(
        Element::new(100., 200., 500., 500.)
            .with_child(Element::new(10., 20., 100., 100.).with_child(leaf)),
    );
    assert_eq!(
        tree.absolute_bounds(leaf_id),
        Some(Rect::xywh(115., 226., 1., 1.))
    );
}

#[test]
fn centered_column() {
    let mut tree = ElementTree::new(
        Element::new(0., 0., 200., 300.)
            .with_padding(perch::Insets::new(30., 0., 4., 0.))
            .with_component(LayoutComponent::new(VerticalLayout::new(8., Alignment::Center))),
    );
    let root = tree.root();
    let ids: Vec<_> = [50., 100., 75.]
        .iter()
        .map(|width| tree.add_child(root, Element::new(0., 0., *width, 10.)).unwrap())
        .collect();
    tree.render(&mut DrawList::new());

    let frames: Vec<_> = ids.iter().filter_map(|id| tree.bounds(*id)).collect();
    let xs: Vec<_> = frames.iter().map(|f| f.x()).collect();
    let ys: Vec<_> = frames.iter().map(|f| f.y()).collect();
    assert_eq!(xs, vec![75., 50., 62.5]);
    assert_eq!(ys, vec![4., 22., 40.]);
}

#[test]
fn justified_row() {
    let mut tree = ElementTree::new(
        Element::new(0., 0., 220., 40.)
            .with_component(LayoutComponent::new(JustifyLayout::horizontal())),
    );
    let root = tree.root();
    let ids: Vec<_> = (0..3)
        .map(|_| tree.add_child(root, Element::new(0., 0., 40., 40.)).unwrap())
        .collect();
    tree.update(0.);
    let xs: Vec<_> = ids.iter().filter_map(|id| tree.bounds(*id)).map(|b| b.x()).collect();
    assert_eq!(xs, vec![0., 90., 180.]);
}

#[test]
fn scroll_clamps() {
    let mut state = ScrollState::default();
    state.set_content_size(100., 1000.);
    state.set_viewport_size(100., 400.);
    assert_eq!(state.max_scroll_y(), 600.);
    state.scroll_by(0., 10000.);
    assert_eq!(state.offset(), Vector2::new(0., 600.));
    assert_eq!(state.scroll_y_normalized(), 1.);
}

#[test]
fn region_priority_and_fallthrough() {
    let mut regions = RegionDispatcher::new();
    let low = RegionHandler::new(|hits: &mut Vec<&'static str>, _: &MouseEvent| {
        hits.push("low");
        true
    });
    let high = RegionHandler::new(|hits: &mut Vec<&'static str>, _: &MouseEvent| {
        hits.push("high");
        true
    });
    regions.register_region(Rect::xywh(0., 0., 100., 100.), low, 1);
    let top = regions.register_region(Rect::xywh(0., 0., 100., 100.), high, 2);

    let mut hits = Vec::new();
    regions.dispatch_event(&mut hits, &MouseEvent::click(50., 50.));
    regions.set_region_enabled(top, false);
    regions.dispatch_event(&mut hits, &MouseEvent::click(50., 50.));
    assert_eq!(hits, vec!["high", "low"]);
}
