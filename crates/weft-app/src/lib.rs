#![deny(missing_docs)]

//! Application instances: a render function bound to a host container.
//!
//! The render function runs as a tracked computation. Its first run mounts
//! the produced tree; every run triggered by a state write afterwards patches
//! the previous tree in place.

mod error;

pub use error::AppError;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use weft_core::{ComputationError, Effect, Runtime};
use weft_dom::{dispatch_event, mount, patch, EventSource, HostHandle, HostRenderer, TreeNode};

type RenderFn = Box<dyn FnMut() -> Result<TreeNode, ComputationError>>;

/// Lifecycle of an application instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppPhase {
    /// Not rendered yet.
    #[default]
    Created,
    /// The first tree is in the host; later renders patch it.
    Mounted,
}

/// An application that has not been mounted yet.
pub struct AppBuilder {
    render: RenderFn,
}

/// Creates an application from an infallible render function.
pub fn create_app(mut render: impl FnMut() -> TreeNode + 'static) -> AppBuilder {
    create_fallible_app(move || Ok(render()))
}

/// Creates an application whose render function may fail.
///
/// A failure surfaces from whichever call triggered the render: the initial
/// [`AppBuilder::mount`] or the state write that caused the re-render.
pub fn create_fallible_app(
    render: impl FnMut() -> Result<TreeNode, ComputationError> + 'static,
) -> AppBuilder {
    AppBuilder {
        render: Box::new(render),
    }
}

impl AppBuilder {
    /// Always [`AppPhase::Created`]; mounting consumes the builder.
    pub fn phase(&self) -> AppPhase {
        AppPhase::Created
    }

    /// Resolves `selector` in `host`, registers the render computation and
    /// mounts its first tree into the container.
    pub fn mount<H: HostRenderer + 'static>(
        self,
        runtime: &Runtime,
        host: Rc<RefCell<H>>,
        selector: &str,
    ) -> Result<App<H>, AppError> {
        let container = host.borrow().resolve_container(selector)?;
        let state = Rc::new(AppState::default());

        let mut render = self.render;
        let render_host = Rc::clone(&host);
        let render_state = Rc::clone(&state);
        let selector_label = selector.to_owned();
        let effect = runtime.effect(move || {
            let next = render()?;
            let mut host = render_host
                .try_borrow_mut()
                .map_err(|_| Box::new(AppError::HostBusy) as ComputationError)?;
            let mut previous = render_state.tree.borrow_mut();
            match previous.as_ref() {
                None => {
                    mount(&mut *host, &next, container, None)?;
                    render_state.phase.set(AppPhase::Mounted);
                    log::info!("app mounted into `{selector_label}`");
                }
                Some(old) => {
                    patch(&mut *host, old, &next)?;
                    log::debug!("app in `{selector_label}` re-rendered");
                }
            }
            *previous = Some(next);
            render_state.renders.set(render_state.renders.get() + 1);
            Ok(())
        })?;

        Ok(App {
            runtime: runtime.clone(),
            host,
            container,
            state,
            effect,
        })
    }
}

impl fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppBuilder").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct AppState {
    phase: Cell<AppPhase>,
    tree: RefCell<Option<TreeNode>>,
    renders: Cell<usize>,
}

/// A mounted application. Dropping it stops re-rendering; the host tree is
/// left as it was.
pub struct App<H> {
    runtime: Runtime,
    host: Rc<RefCell<H>>,
    container: HostHandle,
    state: Rc<AppState>,
    effect: Effect,
}

impl<H> App<H> {
    /// Whether the first tree has been mounted.
    pub fn is_mounted(&self) -> bool {
        self.phase() == AppPhase::Mounted
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AppPhase {
        self.state.phase.get()
    }

    /// Number of completed renders, the initial mount included.
    pub fn render_count(&self) -> usize {
        self.state.renders.get()
    }

    /// The container the app was mounted into.
    pub fn container(&self) -> HostHandle {
        self.container
    }

    /// Host node of the current root element.
    pub fn root_handle(&self) -> Option<HostHandle> {
        self.state
            .tree
            .borrow()
            .as_ref()
            .and_then(TreeNode::host_handle)
    }

    /// The shared host.
    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.host
    }

    /// The runtime tracking the render computation.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Runs `f` against the most recently rendered tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(Option<&TreeNode>) -> R) -> R {
        f(self.state.tree.borrow().as_ref())
    }

    /// Re-renders without any state change.
    pub fn force_render(&self) -> Result<(), AppError> {
        self.effect.run()?;
        Ok(())
    }
}

impl<H: EventSource> App<H> {
    /// Delivers `event` to the listeners on `target`, returning how many ran.
    ///
    /// State written by a listener re-renders the app before this returns.
    pub fn dispatch(&self, target: HostHandle, event: &str) -> Result<usize, ComputationError> {
        dispatch_event(&self.host, target, event)
    }
}

impl<H> Drop for App<H> {
    fn drop(&mut self) {
        self.effect.dispose();
    }
}

impl<H> fmt::Debug for App<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("container", &self.container)
            .field("phase", &self.phase())
            .field("renders", &self.render_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_dom::{h, HostError, MemoryHost};

    #[test]
    fn builder_starts_in_created_phase() {
        let builder = create_app(|| h("p", "x"));
        assert_eq!(builder.phase(), AppPhase::Created);
    }

    #[test]
    fn errors_expose_their_source() {
        use std::error::Error as _;

        let err = AppError::from(HostError::ContainerNotFound {
            selector: "#nope".to_owned(),
        });
        assert!(err.is_container_not_found());
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "host error: container `#nope` not found");
        assert!(AppError::HostBusy.source().is_none());
    }

    #[test]
    fn force_render_reruns_without_writes() {
        let runtime = Runtime::new();
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        host.borrow_mut().create_container("app");

        let app = create_app(|| h("p", "static"))
            .mount(&runtime, Rc::clone(&host), "#app")
            .unwrap();
        app.force_render().unwrap();

        assert_eq!(app.render_count(), 2);
        assert!(app.is_mounted());
    }
}
