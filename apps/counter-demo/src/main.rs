use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use weft_app::{create_app, App};
use weft_core::{field, Field, Reactive, Runtime};
use weft_dom::{h, Children, EventHandler, HostHandle, MemoryHost, TreeNode};

#[derive(Debug)]
struct Board {
    count: i32,
    rows: Vec<String>,
}

const COUNT: Field<Board, i32> = field!(Board, count: i32);
const ROWS: Field<Board, Vec<String>> = field!(Board, rows: Vec<String>);

fn button(label: &str, handler: EventHandler) -> TreeNode {
    TreeNode::element("button")
        .attr("type", "button")
        .on("click", handler)
        .with_text(label)
}

fn render(state: &Reactive<Board>, handlers: &Handlers) -> TreeNode {
    let count = state.get(&COUNT);
    let rows = state.with(&ROWS, |rows| {
        rows.iter()
            .map(|row| h("li", row.as_str()).key(row.as_str()))
            .collect::<Vec<_>>()
    });
    TreeNode::element("main")
        .attr("class", if count < 0 { "negative" } else { "" })
        .child(h("p", format!("count: {count}")))
        .child(button("+", handlers.increment.clone()))
        .child(button("-", handlers.decrement.clone()))
        .child(button("reverse", handlers.reverse.clone()))
        .child(h("ul", rows))
}

struct Handlers {
    increment: EventHandler,
    decrement: EventHandler,
    reverse: EventHandler,
}

impl Handlers {
    fn new(state: &Reactive<Board>) -> Self {
        let add = |delta: i32| {
            let state = state.clone();
            EventHandler::new(move |_| {
                state.update(&COUNT, |count| *count += delta)?;
                Ok(())
            })
        };
        let reverse = {
            let state = state.clone();
            EventHandler::new(move |_| {
                state.update(&ROWS, |rows| rows.reverse())?;
                Ok(())
            })
        };
        Self {
            increment: add(1),
            decrement: add(-1),
            reverse,
        }
    }
}

/// Host handle of the `index`-th child of the rendered root.
fn root_child(app: &App<MemoryHost>, index: usize) -> Option<HostHandle> {
    app.with_tree(|tree| match tree.map(TreeNode::child_nodes) {
        Some(Children::Nodes(children)) => children.get(index).and_then(TreeNode::host_handle),
        _ => None,
    })
}

fn print_host(step: &str, app: &App<MemoryHost>) {
    println!("{step:>12}: {}", app.host().borrow().to_html(app.container()));
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let runtime = Runtime::new();
    let state = runtime.reactive(Board {
        count: 0,
        rows: ["alpha", "beta", "gamma"].map(String::from).to_vec(),
    });
    let handlers = Handlers::new(&state);

    let host = Rc::new(RefCell::new(MemoryHost::new()));
    host.borrow_mut().create_container("app");

    let render_state = state.clone();
    let app = create_app(move || render(&render_state, &handlers)).mount(
        &runtime,
        Rc::clone(&host),
        "#app",
    )?;
    print_host("mounted", &app);

    let plus = root_child(&app, 1).ok_or("missing + button")?;
    let minus = root_child(&app, 2).ok_or("missing - button")?;
    let reverse = root_child(&app, 3).ok_or("missing reverse button")?;

    app.dispatch(plus, "click")?;
    print_host("+", &app);

    app.dispatch(minus, "click")?;
    app.dispatch(minus, "click")?;
    print_host("- -", &app);

    app.dispatch(reverse, "click")?;
    print_host("reverse", &app);

    state.update(&ROWS, |rows| rows.insert(1, "delta".to_owned()))?;
    print_host("insert", &app);

    log::info!(
        "{} renders, {} live host nodes",
        app.render_count(),
        host.borrow().len()
    );
    Ok(())
}
