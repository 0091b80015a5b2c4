#![forbid(unsafe_code)]

//! `wasm-bindgen` entry point.
//!
//! Installs logging, waits for the document, builds the [`PortfolioApp`]
//! over a [`DomSurface`], translates DOM events into [`PageEvent`]s and keeps
//! one `setTimeout` armed for the earliest pending timer. Also publishes the
//! `window.PortfolioApp` namespace. Only compiled on `wasm32` targets.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, ErrorEvent, Event, EventTarget, FormData, HtmlFormElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    Node, Window,
};

use portfolio_core::a11y::KeyFocus;
use portfolio_core::nav::ClickOrigin;
use portfolio_core::scroll::{IntersectionEntry, RevealId};
use portfolio_core::{
    FormField, FormValues, PageError, PageEvent, PortfolioApp, PortfolioConfig, Severity, recover,
};

use crate::console_layer::{BrowserConsole, ConsoleLayer};
use crate::dom::{DomSurface, host_error};
use crate::selectors;

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn install_tracing() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber =
        tracing_subscriber::registry().with(ConsoleLayer::new(BrowserConsole, level));
    // A host page that loads the module twice keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map_or(0.0, |performance| performance.now())
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(0.0)
}

#[derive(Clone, Copy)]
struct ArmedTimer {
    handle: i32,
    deadline_ms: f64,
}

/// Everything the listeners share.
#[derive(Default)]
struct Page {
    app: RefCell<Option<PortfolioApp<DomSurface>>>,
    config_json: RefCell<Option<String>>,
    booted: Cell<bool>,
    /// Window `load` has fired, possibly before the deferred boot ran.
    load_seen: Cell<bool>,
    pump: Cell<Option<ArmedTimer>>,
}

/// Run `f` against the app with the clock moved to now.
///
/// Events raised while the app is already borrowed (a DOM call dispatching
/// synchronously) are dropped. Pending focus moves are applied after the
/// borrow ends, then the timer pump is re-armed.
fn with_app<R>(
    page: &Rc<Page>,
    f: impl FnOnce(&mut PortfolioApp<DomSurface>) -> R,
) -> Option<R> {
    let (out, focus) = {
        let Ok(mut slot) = page.app.try_borrow_mut() else {
            tracing::debug!(target: "portfolio.page", "nested event dropped");
            return None;
        };
        let app = slot.as_mut()?;
        app.set_time_ms(now_ms());
        let out = f(app);
        (out, app.surface_mut().take_pending_focus())
    };
    if let Some(element) = focus {
        recover("focus_next_control", || element.focus().map_err(host_error));
    }
    schedule_pump(page);
    Some(out)
}

fn dispatch(page: &Rc<Page>, event: PageEvent) {
    with_app(page, |app| app.dispatch(event));
}

fn surface_view<T>(page: &Page, f: impl FnOnce(&DomSurface) -> T) -> Option<T> {
    let slot = page.app.try_borrow().ok()?;
    slot.as_ref().map(|app| f(app.surface()))
}

fn defer(f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)?;
    Ok(())
}

/// Keep exactly one `setTimeout` armed for the app's earliest deadline.
fn schedule_pump(page: &Rc<Page>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let deadline = page
        .app
        .try_borrow()
        .ok()
        .and_then(|slot| slot.as_ref().and_then(PortfolioApp::next_deadline_ms));

    let armed = page.pump.get();
    if armed.map(|timer| timer.deadline_ms) == deadline {
        return;
    }
    if let Some(timer) = armed {
        window.clear_timeout_with_handle(timer.handle);
        page.pump.set(None);
    }
    let Some(deadline_ms) = deadline else {
        return;
    };

    let delay = (deadline_ms - now_ms()).ceil().clamp(0.0, f64::from(i32::MAX)) as i32;
    let target = Rc::clone(page);
    let callback = Closure::once_into_js(move || {
        target.pump.set(None);
        if with_app(&target, |_| ()).is_none() {
            schedule_pump(&target);
        }
    });
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay,
    ) {
        Ok(handle) => page.pump.set(Some(ArmedTimer {
            handle,
            deadline_ms,
        })),
        Err(err) => {
            tracing::error!(target: "portfolio.error", entry = "schedule_pump", error = %host_error(err), "entry point failed");
        }
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

// -- boot --------------------------------------------------------------------

fn boot(page: &Rc<Page>) {
    if page.booted.replace(true) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = PortfolioConfig::resolve(page.config_json.borrow().as_deref());
    let Some(surface) = recover("attach_surface", || {
        DomSurface::attach(window.clone(), document.clone()).map_err(host_error)
    }) else {
        return;
    };
    let mut app = PortfolioApp::new(surface, config);
    app.set_time_ms(now_ms());
    app.init();
    let features = app.features();
    let reveal = app.config().reveal_threshold;
    let root_margin = app.config().reveal_root_margin.clone();
    *page.app.borrow_mut() = Some(app);

    recover("bind_navigation", || {
        bind_navigation(page, &document).map_err(host_error)
    });
    if features.contact_form {
        recover("bind_contact_form", || {
            bind_contact_form(page).map_err(host_error)
        });
    }
    if features.scroll_effects {
        recover("bind_scroll_effects", || {
            bind_scroll_effects(page, &window, reveal, &root_margin).map_err(host_error)
        });
    }
    if features.image_animations {
        recover("bind_image_hover", || {
            bind_image_hover(page, &document).map_err(host_error)
        });
    }
    recover("bind_keyboard", || bind_keyboard(page, &document).map_err(host_error));

    if page.load_seen.get() {
        dispatch_load(page);
    }
    schedule_pump(page);
}

fn bind_navigation(page: &Rc<Page>, document: &Document) -> Result<(), JsValue> {
    let widgets = surface_view(page, |surface| {
        (surface.hamburger().cloned(), surface.nav_menu().cloned())
    });
    let (hamburger, menu) = widgets.unwrap_or_default();

    if let Some(hamburger) = &hamburger {
        let page = Rc::clone(page);
        listen(hamburger, "click", move |_| {
            dispatch(&page, PageEvent::HamburgerClick);
        })?;
    }

    let links = document.query_selector_all(selectors::NAV_LINK)?;
    for index in 0..links.length() {
        let Some(link) = links.get(index) else {
            continue;
        };
        let page = Rc::clone(page);
        listen(&link, "click", move |event: Event| {
            event.prevent_default();
            let href = event
                .current_target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|link| link.get_attribute("href"));
            dispatch(&page, PageEvent::NavLinkClick { href });
        })?;
    }

    let page = Rc::clone(page);
    listen(document, "click", move |event: Event| {
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = |widget: &Option<Element>| {
            widget
                .as_ref()
                .is_some_and(|widget| widget.contains(target.as_ref()))
        };
        let origin = ClickOrigin {
            in_trigger: inside(&hamburger),
            in_menu: inside(&menu),
        };
        dispatch(&page, PageEvent::DocumentClick(origin));
    })
}

fn form_value(data: &FormData, field: FormField) -> Option<String> {
    field
        .control_names()
        .iter()
        .find_map(|name| data.get(name).as_string())
}

fn bind_contact_form(page: &Rc<Page>) -> Result<(), JsValue> {
    let Some(form) = surface_view(page, |surface| surface.form().cloned()).flatten() else {
        return Ok(());
    };

    {
        let page = Rc::clone(page);
        let source = form.clone();
        listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            let data = match FormData::new_with_form(&source) {
                Ok(data) => data,
                Err(err) => {
                    recover("handle_form_submit", || Err::<(), _>(host_error(err)));
                    return;
                }
            };
            let values = FormValues {
                name: form_value(&data, FormField::Name),
                email: form_value(&data, FormField::Email),
                message: form_value(&data, FormField::Message),
            };
            dispatch(&page, PageEvent::Submit(values));
        })?;
    }

    let controls = form.query_selector_all(selectors::FORM_CONTROLS)?;
    for index in 0..controls.length() {
        let Some(control) = controls
            .get(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let Some(field) = control
            .get_attribute("name")
            .and_then(|name| FormField::from_control_name(&name))
            .or_else(|| FormField::from_control_name(&control.id()))
        else {
            continue;
        };

        let blur_page = Rc::clone(page);
        let source = control.clone();
        listen(&control, "blur", move |_| {
            let value = Reflect::get(&source, &JsValue::from_str("value"))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_default();
            dispatch(&blur_page, PageEvent::FieldBlur { field, value });
        })?;

        let input_page = Rc::clone(page);
        listen(&control, "input", move |_| {
            dispatch(&input_page, PageEvent::FieldInput { field });
        })?;
    }
    Ok(())
}

fn intersection_entries(entries: &Array) -> Vec<IntersectionEntry> {
    entries
        .iter()
        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
        .filter_map(|entry| {
            let id = entry
                .target()
                .get_attribute(selectors::REVEAL_ID_ATTR)?
                .parse()
                .ok()?;
            Some(IntersectionEntry {
                target: RevealId(id),
                is_intersecting: entry.is_intersecting(),
            })
        })
        .collect()
}

fn bind_scroll_effects(
    page: &Rc<Page>,
    window: &Window,
    threshold: f64,
    root_margin: &str,
) -> Result<(), JsValue> {
    {
        let page = Rc::clone(page);
        let source = window.clone();
        listen(window, "scroll", move |_| {
            let scroll_y = source.scroll_y().unwrap_or(0.0);
            dispatch(&page, PageEvent::Scroll { scroll_y });
        })?;
    }

    let targets = surface_view(page, |surface| surface.reveal_targets().to_vec()).unwrap_or_default();
    let observed = Rc::clone(page);
    let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
        let entries = intersection_entries(&entries);
        dispatch(&observed, PageEvent::Intersection { entries });
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    options.set_root_margin(root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    for target in &targets {
        observer.observe(target);
    }
    Ok(())
}

fn bind_image_hover(page: &Rc<Page>, document: &Document) -> Result<(), JsValue> {
    let Some(container) = document.query_selector(selectors::PROFILE_IMAGE_CONTAINER)? else {
        return Ok(());
    };
    let enter = Rc::clone(page);
    listen(&container, "mouseenter", move |_| {
        dispatch(&enter, PageEvent::ImageHoverEnter);
    })?;
    let leave = Rc::clone(page);
    listen(&container, "mouseleave", move |_| {
        dispatch(&leave, PageEvent::ImageHoverLeave);
    })
}

/// Position of a focused text input among its form's controls.
fn key_focus(target: Option<EventTarget>) -> (KeyFocus, Option<HtmlFormElement>) {
    let Some(element) = target.and_then(|target| target.dyn_into::<Element>().ok()) else {
        return (KeyFocus::Elsewhere, None);
    };
    if element.tag_name() != "INPUT" {
        return (KeyFocus::Elsewhere, None);
    }
    let Some(form) = element
        .closest("form")
        .ok()
        .flatten()
        .and_then(|form| form.dyn_into::<HtmlFormElement>().ok())
    else {
        return (KeyFocus::Elsewhere, None);
    };
    let Ok(controls) = form.query_selector_all(selectors::FORM_CONTROLS) else {
        return (KeyFocus::Elsewhere, None);
    };
    let node: &Node = &element;
    let count = controls.length();
    match (0..count).find(|&i| controls.get(i).is_some_and(|c| c.is_same_node(Some(node)))) {
        Some(index) => (
            KeyFocus::FormInput {
                index: index as usize,
                count: count as usize,
            },
            Some(form),
        ),
        None => (KeyFocus::Elsewhere, None),
    }
}

fn bind_keyboard(page: &Rc<Page>, document: &Document) -> Result<(), JsValue> {
    let page = Rc::clone(page);
    listen(document, "keydown", move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        let (focus, form) = key_focus(event.target());
        with_app(&page, |app| {
            app.surface_mut().set_key_form(form);
            app.dispatch(PageEvent::KeyDown { key, focus });
        });
    })
}

fn dispatch_load(page: &Rc<Page>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    dispatch(
        page,
        PageEvent::Load {
            viewport_width: viewport_width(&window),
            elapsed_ms: Some(now_ms()),
        },
    );
}

fn page_error(event: &ErrorEvent) -> PageError {
    let error = event.error();
    let error_name = if error.is_object() {
        Reflect::get(&error, &JsValue::from_str("name"))
            .ok()
            .and_then(|name| name.as_string())
    } else {
        None
    };
    PageError {
        message: event.message(),
        filename: event.filename(),
        lineno: event.lineno(),
        colno: event.colno(),
        error_name,
    }
}

// -- window.PortfolioApp -------------------------------------------------------

fn export<T: ?Sized + WasmClosure>(namespace: &Object, name: &str, function: Closure<T>) {
    recover("expose_namespace", || {
        Reflect::set(namespace, &JsValue::from_str(name), function.as_ref())
            .map(drop)
            .map_err(host_error)
    });
    function.forget();
}

fn expose_namespace(window: &Window, page: &Rc<Page>) -> Result<(), JsValue> {
    let namespace = Object::new();

    let target = Rc::clone(page);
    export(
        &namespace,
        "showNotification",
        Closure::wrap(Box::new(move |message: JsValue, kind: JsValue| {
            let message = message.as_string().unwrap_or_default();
            let severity = kind
                .as_string()
                .map_or(Severity::Info, |kind| Severity::parse(&kind));
            let shown = with_app(&target, |app| app.show_notification(&message, severity))
                .flatten()
                .is_some();
            JsValue::from_bool(shown)
        }) as Box<dyn FnMut(JsValue, JsValue) -> JsValue>),
    );

    let target = Rc::clone(page);
    export(
        &namespace,
        "triggerSmileAnimation",
        Closure::wrap(Box::new(move || {
            JsValue::from_bool(with_app(&target, PortfolioApp::trigger_smile_animation) == Some(true))
        }) as Box<dyn FnMut() -> JsValue>),
    );

    let target = Rc::clone(page);
    export(
        &namespace,
        "triggerBlinkAnimation",
        Closure::wrap(Box::new(move || {
            JsValue::from_bool(with_app(&target, PortfolioApp::trigger_blink_animation) == Some(true))
        }) as Box<dyn FnMut() -> JsValue>),
    );

    let target = Rc::clone(page);
    export(
        &namespace,
        "isMobileDevice",
        Closure::wrap(Box::new(move || {
            let width = web_sys::window().map_or(0.0, |window| viewport_width(&window));
            let mobile = target
                .app
                .try_borrow()
                .ok()
                .and_then(|slot| slot.as_ref().map(|app| app.is_mobile_device(width)))
                .unwrap_or_else(|| PortfolioConfig::default().is_mobile_width(width));
            JsValue::from_bool(mobile)
        }) as Box<dyn FnMut() -> JsValue>),
    );

    let target = Rc::clone(page);
    export(
        &namespace,
        "configure",
        Closure::wrap(Box::new(move |json: JsValue| {
            if target.booted.get() {
                tracing::warn!(target: "portfolio.page", "configure called after start; ignored");
                return JsValue::FALSE;
            }
            let Some(json) = json.as_string() else {
                return JsValue::FALSE;
            };
            let valid = PortfolioConfig::load_json(&json).is_ok();
            *target.config_json.borrow_mut() = Some(json);
            JsValue::from_bool(valid)
        }) as Box<dyn FnMut(JsValue) -> JsValue>),
    );

    let target = Rc::clone(page);
    export(
        &namespace,
        "pushEncodedEvent",
        Closure::wrap(Box::new(move |json: JsValue| {
            let Some(json) = json.as_string() else {
                return JsValue::FALSE;
            };
            JsValue::from_bool(with_app(&target, |app| app.push_encoded_event(&json)) == Some(true))
        }) as Box<dyn FnMut(JsValue) -> JsValue>),
    );

    Reflect::set(window, &JsValue::from_str("PortfolioApp"), &namespace)?;
    Ok(())
}

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    install_tracing();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let page = Rc::new(Page::default());

    expose_namespace(&window, &page)?;

    {
        let page = Rc::clone(&page);
        listen(&window, "load", move |_| {
            page.load_seen.set(true);
            if page.booted.get() {
                dispatch_load(&page);
            }
        })?;
    }
    {
        let page = Rc::clone(&page);
        listen(&window, "error", move |event: Event| {
            if let Some(event) = event.dyn_ref::<ErrorEvent>() {
                dispatch(&page, PageEvent::Error(page_error(event)));
            }
        })?;
    }

    match document.ready_state().as_str() {
        "loading" => listen(&document, "DOMContentLoaded", move |_| boot(&page)),
        state => {
            if state == "complete" {
                page.load_seen.set(true);
            }
            // Give the script that loaded the module a turn to call `configure`.
            defer(move || boot(&page))
        }
    }
}
