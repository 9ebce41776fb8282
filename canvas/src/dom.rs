//! Browser bindings (`web` feature).
//!
//! [`EventBindings`] is the single subscription object that connects DOM
//! events to an [`EngineCore`]. Pointer, wheel and drag listeners go on the
//! canvas host element; `keydown` goes on the window so navigation works
//! whichever element has focus. Dropping the bindings removes every listener.
//!
//! Actions produced by the engine pass through a small dispatcher first:
//! `ReleaseResource` revokes the object URL and `SetCursor` updates the host
//! style. Every action is then forwarded to the caller's sink.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, DragEvent, Event, EventTarget, File, HtmlElement, KeyboardEvent, MouseEvent, Url,
    WheelEvent, Window,
};

use crate::camera::Point;
use crate::doc::ResourceRef;
use crate::engine::{Action, EngineCore};
use crate::ingest::{FileInfo, IngestError, IngestedImage, MediaIngest};
use crate::input::{Button, Key, Modifiers, WheelDelta};

type Listener = Closure<dyn FnMut(Event)>;
type Sink = Rc<dyn Fn(Vec<Action>)>;

/// [`MediaIngest`] for browser `File`s, backed by object URLs.
///
/// Natural sizes are not known until the image decodes, so items get the
/// layout's placeholder extent.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlobIngest;

impl MediaIngest for BlobIngest {
    type File = File;

    fn describe(&self, file: &File) -> FileInfo {
        FileInfo::new(file.name(), file.type_())
    }

    fn ingest(&mut self, file: &File) -> Result<IngestedImage, IngestError> {
        let url = Url::create_object_url_with_blob(file).map_err(|err| IngestError::Resource(format!("{err:?}")))?;
        Ok(IngestedImage { resource: ResourceRef::new(url), width: 0.0, height: 0.0 })
    }
}

struct Registration {
    target: EventTarget,
    kind: &'static str,
    listener: Listener,
}

/// Live DOM subscriptions for one canvas.
pub struct EventBindings {
    registrations: Vec<Registration>,
}

impl EventBindings {
    /// Attach every listener.
    ///
    /// # Errors
    ///
    /// Returns the DOM exception if a listener cannot be attached. Listeners
    /// attached before the failure are removed again.
    pub fn subscribe(
        host: &HtmlElement,
        window: &Window,
        engine: Rc<RefCell<EngineCore>>,
        sink: Rc<dyn Fn(Vec<Action>)>,
    ) -> Result<Self, JsValue> {
        let dispatch: Sink = {
            let host = host.clone();
            Rc::new(move |actions: Vec<Action>| {
                apply_browser_effects(&host, &actions);
                sink(actions);
            })
        };
        let mut bindings = Self { registrations: Vec::new() };
        let host_target: &EventTarget = host.as_ref();
        let window_target: &EventTarget = window.as_ref();

        let origin = host.clone();
        bindings.listen(
            host_target,
            "pointerdown",
            false,
            handler(&engine, &dispatch, move |core, event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return Vec::new();
                };
                core.on_pointer_down(local_point(&origin, mouse), Button::from_dom(mouse.button()), mouse_modifiers(mouse))
            }),
        )?;

        let origin = host.clone();
        bindings.listen(
            host_target,
            "pointermove",
            false,
            handler(&engine, &dispatch, move |core, event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return Vec::new();
                };
                core.on_pointer_move(local_point(&origin, mouse), mouse_modifiers(mouse))
            }),
        )?;

        let origin = host.clone();
        bindings.listen(
            host_target,
            "pointerup",
            false,
            handler(&engine, &dispatch, move |core, event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return Vec::new();
                };
                core.on_pointer_up(local_point(&origin, mouse), Button::from_dom(mouse.button()))
            }),
        )?;

        bindings.listen(host_target, "pointerleave", false, handler(&engine, &dispatch, |core, _| core.on_pointer_leave()))?;

        // Non-passive so the page never scrolls or zooms underneath the canvas.
        bindings.listen(
            host_target,
            "wheel",
            true,
            handler(&engine, &dispatch, |core, event| {
                event.prevent_default();
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return Vec::new();
                };
                core.on_wheel(WheelDelta { dx: wheel.delta_x(), dy: wheel.delta_y() }, mouse_modifiers(wheel))
            }),
        )?;

        bindings.listen(
            host_target,
            "dragenter",
            false,
            handler(&engine, &dispatch, |core, event| {
                let has_files = drag_has_files(event);
                if has_files {
                    event.prevent_default();
                }
                core.on_drag_enter(has_files)
            }),
        )?;

        bindings.listen(
            host_target,
            "dragover",
            false,
            handler(&engine, &dispatch, |core, event| {
                let has_files = drag_has_files(event);
                if has_files {
                    event.prevent_default();
                }
                core.on_drag_over(has_files)
            }),
        )?;

        bindings.listen(host_target, "dragleave", false, handler(&engine, &dispatch, |core, _| core.on_drag_leave()))?;

        bindings.listen(
            host_target,
            "drop",
            false,
            handler(&engine, &dispatch, |core, event| {
                event.prevent_default();
                let files = dropped_files(event);
                core.on_drop(&files, &mut BlobIngest)
            }),
        )?;

        bindings.listen(
            window_target,
            "keydown",
            false,
            handler(&engine, &dispatch, |core, event| {
                let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                    return Vec::new();
                };
                let modifiers = Modifiers {
                    shift: keyboard.shift_key(),
                    ctrl: keyboard.ctrl_key(),
                    alt: keyboard.alt_key(),
                    meta: keyboard.meta_key(),
                };
                let actions = core.on_key_down(&Key(keyboard.key()), modifiers);
                if !actions.is_empty() {
                    event.prevent_default();
                }
                actions
            }),
        )?;

        debug!(listeners = bindings.registrations.len(), "canvas events subscribed");
        Ok(bindings)
    }

    fn listen(&mut self, target: &EventTarget, kind: &'static str, non_passive: bool, listener: Listener) -> Result<(), JsValue> {
        let callback: &js_sys::Function = listener.as_ref().unchecked_ref();
        if non_passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            target.add_event_listener_with_callback_and_add_event_listener_options(kind, callback, &options)?;
        } else {
            target.add_event_listener_with_callback(kind, callback)?;
        }
        self.registrations.push(Registration { target: target.clone(), kind, listener });
        Ok(())
    }
}

impl Drop for EventBindings {
    fn drop(&mut self) {
        for reg in self.registrations.drain(..) {
            if let Err(err) = reg.target.remove_event_listener_with_callback(reg.kind, reg.listener.as_ref().unchecked_ref())
            {
                warn!(kind = reg.kind, ?err, "failed to remove listener");
            }
        }
        debug!("canvas events unsubscribed");
    }
}

/// Wrap an engine call as a DOM listener.
///
/// A re-entrant event (fired while the engine is already borrowed, e.g. from
/// inside the sink) is dropped.
fn handler<F>(engine: &Rc<RefCell<EngineCore>>, dispatch: &Sink, f: F) -> Listener
where
    F: Fn(&mut EngineCore, &Event) -> Vec<Action> + 'static,
{
    let engine = Rc::clone(engine);
    let dispatch = Rc::clone(dispatch);
    Closure::new(move |event: Event| {
        let actions = match engine.try_borrow_mut() {
            Ok(mut core) => f(&mut core, &event),
            Err(_) => {
                debug!(kind = %event.type_(), "engine busy; event dropped");
                return;
            }
        };
        if !actions.is_empty() {
            dispatch(actions);
        }
    })
}

fn apply_browser_effects(host: &HtmlElement, actions: &[Action]) {
    for action in actions {
        match action {
            Action::ReleaseResource(resource) => {
                if let Err(err) = Url::revoke_object_url(resource.as_str()) {
                    warn!(resource = resource.as_str(), ?err, "failed to revoke object url");
                }
            }
            Action::SetCursor(cursor) => {
                if let Err(err) = host.style().set_property("cursor", cursor.css()) {
                    warn!(?err, "failed to set cursor");
                }
            }
            _ => {}
        }
    }
}

/// Pointer position relative to the host element's top-left corner.
fn local_point(host: &HtmlElement, mouse: &MouseEvent) -> Point {
    let rect = host.get_bounding_client_rect();
    Point::new(f64::from(mouse.client_x()) - rect.left(), f64::from(mouse.client_y()) - rect.top())
}

fn mouse_modifiers(mouse: &MouseEvent) -> Modifiers {
    Modifiers { shift: mouse.shift_key(), ctrl: mouse.ctrl_key(), alt: mouse.alt_key(), meta: mouse.meta_key() }
}

fn drag_has_files(event: &Event) -> bool {
    event
        .dyn_ref::<DragEvent>()
        .and_then(DragEvent::data_transfer)
        .is_some_and(|dt| dt.types().includes(&JsValue::from_str("Files"), 0))
}

fn dropped_files(event: &Event) -> Vec<File> {
    let Some(list) = event.dyn_ref::<DragEvent>().and_then(DragEvent::data_transfer).and_then(|dt| dt.files()) else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}
