use std::cell::{Cell, RefCell};
use std::rc::Rc;

use weft_app::{create_app, create_fallible_app, AppError, AppPhase};
use weft_core::{field, ReactiveError, Runtime};
use weft_dom::{h, EventHandler, HostRenderer, MemoryHost, TreeNode};
use weft_testing::{assert_html, keyed_list, HostOp, RecordingHost};

#[derive(Debug, Default)]
struct Counter {
    count: i32,
}

fn memory_host() -> Rc<RefCell<MemoryHost>> {
    let host = Rc::new(RefCell::new(MemoryHost::new()));
    host.borrow_mut().create_container("app");
    host
}

#[test]
fn counter_updates_the_same_paragraph() {
    let runtime = Runtime::new();
    let count = field!(Counter, count: i32);
    let state = runtime.reactive(Counter::default());
    let host = Rc::new(RefCell::new(RecordingHost::new(MemoryHost::new())));
    host.borrow_mut().inner_mut().create_container("app");

    let render_state = state.clone();
    let app = create_app(move || h("p", render_state.get(&count).to_string()))
        .mount(&runtime, Rc::clone(&host), "#app")
        .expect("mount succeeds");

    assert_eq!(app.phase(), AppPhase::Mounted);
    let paragraph = app.root_handle().expect("root mounted");
    assert_eq!(host.borrow().inner().text_content(paragraph), "0");
    host.borrow_mut().clear_ops();

    state.set(&count, 1).expect("re-render succeeds");

    assert_eq!(app.root_handle(), Some(paragraph));
    assert_eq!(host.borrow().inner().text_content(paragraph), "1");
    assert_eq!(
        host.borrow().ops(),
        &[HostOp::SetTextContent {
            node: paragraph,
            text: "1".to_owned()
        }]
    );
    assert_eq!(app.render_count(), 2);
}

#[test]
fn unknown_container_fails_mount() {
    let runtime = Runtime::new();
    let host = memory_host();
    let rendered = Rc::new(Cell::new(false));

    let flag = Rc::clone(&rendered);
    let err = create_app(move || {
        flag.set(true);
        h("p", "never")
    })
    .mount(&runtime, host, "#missing")
    .expect_err("no such container");

    assert!(err.is_container_not_found());
    assert!(!rendered.get());
}

#[test]
fn initial_render_failure_fails_mount() {
    let runtime = Runtime::new();
    let host = memory_host();

    let err = create_fallible_app(|| Err("template error".into()))
        .mount(&runtime, Rc::clone(&host), "#app")
        .expect_err("render failed");

    assert!(matches!(
        err,
        AppError::Reactive(ReactiveError::Computation { .. })
    ));
    assert!(!runtime.is_tracking());
    let container = host.borrow().resolve_container("#app").unwrap();
    assert!(host.borrow().children(container).is_empty());
}

#[test]
fn render_failure_reaches_the_writer_and_keeps_the_last_tree() {
    let runtime = Runtime::new();
    let count = field!(Counter, count: i32);
    let state = runtime.reactive(Counter::default());
    let host = memory_host();

    let render_state = state.clone();
    let app = create_fallible_app(move || {
        let value = render_state.get(&count);
        if value < 0 {
            return Err(format!("negative count {value}").into());
        }
        Ok(h("p", value.to_string()))
    })
    .mount(&runtime, Rc::clone(&host), "#app")
    .unwrap();
    let paragraph = app.root_handle().unwrap();

    let err = state.set(&count, -1).expect_err("render rejects negatives");
    assert!(err.to_string().contains("negative count -1"));
    assert!(!runtime.is_tracking());
    assert_eq!(host.borrow().text_content(paragraph), "0");

    state.set(&count, 5).expect("app recovers on the next write");
    assert_eq!(host.borrow().text_content(paragraph), "5");
    assert_eq!(app.render_count(), 2);
}

#[test]
fn click_handlers_drive_re_renders() {
    let runtime = Runtime::new();
    let count = field!(Counter, count: i32);
    let state = runtime.reactive(Counter::default());
    let host = memory_host();

    let increment = {
        let state = state.clone();
        EventHandler::new(move |_| {
            state.update(&count, |count| *count += 1)?;
            Ok(())
        })
    };
    let render_state = state.clone();
    let app = create_app(move || {
        TreeNode::element("div")
            .child(h("span", render_state.get(&count).to_string()))
            .child(
                TreeNode::element("button")
                    .on("click", increment.clone())
                    .with_text("+"),
            )
    })
    .mount(&runtime, Rc::clone(&host), "#app")
    .unwrap();

    let button = app
        .with_tree(|tree| match tree.map(TreeNode::child_nodes) {
            Some(weft_dom::Children::Nodes(children)) => children[1].host_handle(),
            _ => None,
        })
        .expect("button mounted");

    assert_eq!(app.dispatch(button, "click").unwrap(), 1);
    assert_eq!(app.dispatch(button, "click").unwrap(), 1);

    let root = app.root_handle().unwrap();
    assert_html(
        &host.borrow(),
        root,
        "<div><span>2</span><button>+</button></div>",
    );
    assert_eq!(host.borrow().listener_count(button, "click"), 1);
    assert_eq!(app.render_count(), 3);
}

#[test]
fn keyed_rows_follow_state_order() {
    #[derive(Default)]
    struct Rows {
        keys: Vec<&'static str>,
    }

    let runtime = Runtime::new();
    let keys = field!(Rows, keys: Vec<&'static str>);
    let state = runtime.reactive(Rows {
        keys: vec!["a", "b", "c"],
    });
    let host = Rc::new(RefCell::new(RecordingHost::new(MemoryHost::new())));
    host.borrow_mut().inner_mut().create_container("app");

    let render_state = state.clone();
    let app = create_app(move || render_state.with(&keys, |keys| keyed_list(keys)))
        .mount(&runtime, Rc::clone(&host), "#app")
        .unwrap();
    host.borrow_mut().clear_ops();

    state.set(&keys, vec!["c", "a", "b"]).unwrap();

    let list = app.root_handle().unwrap();
    assert_eq!(host.borrow().count(HostOp::is_create), 0);
    assert_eq!(host.borrow().count(HostOp::is_remove), 0);
    assert_html(
        host.borrow().inner(),
        list,
        "<ul><li>c</li><li>a</li><li>b</li></ul>",
    );
}

#[test]
fn dropping_the_app_stops_rendering() {
    let runtime = Runtime::new();
    let count = field!(Counter, count: i32);
    let state = runtime.reactive(Counter::default());
    let host = memory_host();
    let renders = Rc::new(Cell::new(0));

    let render_state = state.clone();
    let render_count = Rc::clone(&renders);
    let app = create_app(move || {
        render_count.set(render_count.get() + 1);
        h("p", render_state.get(&count).to_string())
    })
    .mount(&runtime, Rc::clone(&host), "#app")
    .unwrap();
    let paragraph = app.root_handle().unwrap();

    drop(app);
    state.set(&count, 9).unwrap();

    assert_eq!(renders.get(), 1);
    assert_eq!(host.borrow().text_content(paragraph), "0");
}

#[test]
fn writes_while_the_host_is_borrowed_fail_cleanly() {
    let runtime = Runtime::new();
    let count = field!(Counter, count: i32);
    let state = runtime.reactive(Counter::default());
    let host = memory_host();

    let render_state = state.clone();
    let _app = create_app(move || h("p", render_state.get(&count).to_string()))
        .mount(&runtime, Rc::clone(&host), "#app")
        .unwrap();

    let guard = host.borrow();
    let err = state.set(&count, 1).expect_err("host is busy");
    drop(guard);

    assert!(err.to_string().contains("host is borrowed elsewhere"));
    state.set(&count, 2).unwrap();
}

#[test]
fn tag_changes_replace_the_root() {
    let runtime = Runtime::new();
    let count = field!(Counter, count: i32);
    let state = runtime.reactive(Counter::default());
    let host = memory_host();

    let render_state = state.clone();
    let app = create_app(move || {
        let value = render_state.get(&count);
        let tag = if value % 2 == 0 { "p" } else { "pre" };
        h(tag, value.to_string())
    })
    .mount(&runtime, Rc::clone(&host), "#app")
    .unwrap();
    let first = app.root_handle().unwrap();

    state.set(&count, 1).unwrap();

    let second = app.root_handle().unwrap();
    assert_ne!(first, second);
    assert!(!host.borrow().contains(first));
    assert_html(&host.borrow(), app.container(), r#"<div id="app"><pre>1</pre></div>"#);
}
