#![forbid(unsafe_code)]

//! `web-sys` implementation of the rendering ports.
//!
//! Widgets are looked up once in [`DomSurface::attach`]; nodes created at
//! runtime (banners, notifications) are tracked by id so timers can find
//! them again. Only compiled on `wasm32` targets.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, ScrollBehavior,
    ScrollToOptions, Window,
};

use portfolio_core::a11y::{FocusSurface, FocusTarget};
use portfolio_core::form::{BannerId, FIELD_ERROR_STYLE, FormSurface, SUCCESS_BANNER};
use portfolio_core::image::{AnimationKind, ImageSurface};
use portfolio_core::nav::NavSurface;
use portfolio_core::notice::{NoticeId, NoticeSurface, Notification};
use portfolio_core::scroll::{NavbarStyle, RevealId, ScrollSurface};
use portfolio_core::{FormField, SurfaceError};

use crate::selectors;
use crate::style;

/// Convert a thrown JS value into a port failure.
pub fn host_error(value: JsValue) -> SurfaceError {
    let text = value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    SurfaceError::Host(text)
}

fn html(element: Element) -> Option<HtmlElement> {
    element.dyn_into::<HtmlElement>().ok()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), SurfaceError> {
    element
        .style()
        .set_property(property, value)
        .map_err(host_error)
}

pub struct DomSurface {
    window: Window,
    document: Document,
    body: Option<HtmlElement>,
    hamburger: Option<Element>,
    nav_menu: Option<Element>,
    form: Option<HtmlFormElement>,
    navbar: Option<HtmlElement>,
    profile_image: Option<HtmlElement>,
    reveal_targets: Vec<HtmlElement>,
    banners: HashMap<BannerId, Element>,
    notices: HashMap<NoticeId, HtmlElement>,
    key_form: Option<HtmlFormElement>,
    pending_focus: Option<FocusTarget>,
}

impl DomSurface {
    /// Look up the page widgets and number the reveal targets.
    pub fn attach(window: Window, document: Document) -> Result<Self, JsValue> {
        let hamburger = document.query_selector(selectors::HAMBURGER)?;
        let nav_menu = document.query_selector(selectors::NAV_MENU)?;
        let form = document
            .get_element_by_id(selectors::CONTACT_FORM_ID)
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
        let navbar = document.query_selector(selectors::NAVBAR)?.and_then(html);
        let profile_image = document
            .get_element_by_id(selectors::PROFILE_IMAGE_ID)
            .and_then(html);

        let nodes = document.query_selector_all(selectors::REVEAL_TARGETS)?;
        let mut reveal_targets = Vec::with_capacity(nodes.length() as usize);
        for index in 0..nodes.length() {
            let Some(element) = nodes.get(index).and_then(|n| n.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            let id = reveal_targets.len();
            element.set_attribute(selectors::REVEAL_ID_ATTR, &id.to_string())?;
            reveal_targets.push(element);
        }

        Ok(Self {
            body: document.body(),
            window,
            document,
            hamburger,
            nav_menu,
            form,
            navbar,
            profile_image,
            reveal_targets,
            banners: HashMap::new(),
            notices: HashMap::new(),
            key_form: None,
            pending_focus: None,
        })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn hamburger(&self) -> Option<&Element> {
        self.hamburger.as_ref()
    }

    #[must_use]
    pub fn nav_menu(&self) -> Option<&Element> {
        self.nav_menu.as_ref()
    }

    #[must_use]
    pub fn form(&self) -> Option<&HtmlFormElement> {
        self.form.as_ref()
    }

    #[must_use]
    pub fn reveal_targets(&self) -> &[HtmlElement] {
        &self.reveal_targets
    }

    /// Remember the form a key event came from, for a following focus move.
    pub fn set_key_form(&mut self, form: Option<HtmlFormElement>) {
        self.key_form = form;
    }

    /// Resolve and clear the focus move requested during the last dispatch.
    ///
    /// Focusing fires `blur` synchronously, so the caller applies it once the
    /// app is no longer borrowed.
    pub fn take_pending_focus(&mut self) -> Option<HtmlElement> {
        let target = self.pending_focus.take()?;
        let form = self.key_form.take()?;
        let element = match target {
            FocusTarget::Control(index) => form
                .query_selector_all(selectors::FORM_CONTROLS)
                .ok()?
                .get(u32::try_from(index).ok()?)?
                .dyn_into::<HtmlElement>()
                .ok()?,
            FocusTarget::SubmitButton => html(form.query_selector(selectors::SUBMIT_BUTTON).ok()??)?,
        };
        Some(element)
    }

    fn field_control(&self, field: FormField) -> Result<Option<HtmlElement>, SurfaceError> {
        for name in field.control_names() {
            if let Some(control) = self.document.get_element_by_id(name).and_then(html) {
                return Ok(Some(control));
            }
        }
        let Some(form) = &self.form else {
            return Ok(None);
        };
        for name in field.control_names() {
            let found = form
                .query_selector(&selectors::named_control(name))
                .map_err(host_error)?
                .and_then(html);
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    fn field_group(&self, field: FormField) -> Result<Option<Element>, SurfaceError> {
        let Some(control) = self.field_control(field)? else {
            return Ok(None);
        };
        control.closest(selectors::FORM_GROUP).map_err(host_error)
    }

    fn submit_button(&self) -> Result<Option<Element>, SurfaceError> {
        let Some(form) = &self.form else {
            return Ok(None);
        };
        form.query_selector(selectors::SUBMIT_BUTTON)
            .map_err(host_error)
    }

    fn create(&self, tag: &str) -> Result<Element, SurfaceError> {
        self.document.create_element(tag).map_err(host_error)
    }

    fn body(&self) -> Result<&HtmlElement, SurfaceError> {
        self.body.as_ref().ok_or(SurfaceError::MissingElement("body"))
    }
}

impl NavSurface for DomSurface {
    fn has_menu(&self) -> bool {
        self.hamburger.is_some() && self.nav_menu.is_some()
    }

    fn menu_active(&self) -> Result<bool, SurfaceError> {
        let menu = self
            .nav_menu
            .as_ref()
            .ok_or(SurfaceError::MissingElement(selectors::NAV_MENU))?;
        Ok(menu.class_list().contains(selectors::ACTIVE_CLASS))
    }

    fn set_menu_active(&mut self, active: bool) -> Result<(), SurfaceError> {
        for widget in [&self.hamburger, &self.nav_menu].into_iter().flatten() {
            widget
                .class_list()
                .toggle_with_force(selectors::ACTIVE_CLASS, active)
                .map_err(host_error)?;
        }
        Ok(())
    }

    fn set_scroll_locked(&mut self, locked: bool) -> Result<(), SurfaceError> {
        set_style(self.body()?, "overflow", if locked { "hidden" } else { "auto" })
    }

    fn section_offset_top(&self, href: &str) -> Result<Option<f64>, SurfaceError> {
        let section = self.document.query_selector(href).map_err(host_error)?;
        Ok(section
            .and_then(html)
            .map(|section| f64::from(section.offset_top())))
    }

    fn scroll_to(&mut self, top: f64) -> Result<(), SurfaceError> {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }
}

impl FormSurface for DomSurface {
    fn has_form(&self) -> bool {
        self.form.is_some()
    }

    fn put_field_error(&mut self, field: FormField, message: &str) -> Result<bool, SurfaceError> {
        let Some(group) = self.field_group(field)? else {
            return Ok(false);
        };
        if let Some(existing) = group
            .query_selector(selectors::FIELD_ERROR)
            .map_err(host_error)?
        {
            existing.remove();
        }
        let node = self.create("div")?;
        node.set_class_name(FIELD_ERROR_STYLE.class);
        node.set_text_content(Some(message));
        if let Some(node) = node.dyn_ref::<HtmlElement>() {
            set_style(node, "color", FIELD_ERROR_STYLE.color)?;
            set_style(node, "font-size", FIELD_ERROR_STYLE.font_size)?;
            set_style(node, "margin-top", FIELD_ERROR_STYLE.margin_top)?;
        }
        group.append_child(&node).map_err(host_error)?;
        Ok(true)
    }

    fn remove_field_error(&mut self, field: FormField) -> Result<bool, SurfaceError> {
        let Some(group) = self.field_group(field)? else {
            return Ok(false);
        };
        match group
            .query_selector(selectors::FIELD_ERROR)
            .map_err(host_error)?
        {
            Some(existing) => {
                existing.remove();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_field_border(&mut self, field: FormField, color: &str) -> Result<(), SurfaceError> {
        match self.field_control(field)? {
            Some(control) => set_style(&control, "border-color", color),
            None => Ok(()),
        }
    }

    fn submit_label(&self) -> Result<Option<String>, SurfaceError> {
        Ok(self
            .submit_button()?
            .map(|button| button.text_content().unwrap_or_default()))
    }

    fn set_submit_state(&mut self, label: &str, disabled: bool) -> Result<(), SurfaceError> {
        let Some(button) = self.submit_button()? else {
            return Ok(());
        };
        button.set_text_content(Some(label));
        if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        }
        Ok(())
    }

    fn reset_form(&mut self) -> Result<(), SurfaceError> {
        if let Some(form) = &self.form {
            form.reset();
        }
        Ok(())
    }

    fn insert_success_banner(&mut self, id: BannerId) -> Result<(), SurfaceError> {
        let form = self
            .form
            .as_ref()
            .ok_or(SurfaceError::MissingElement("#contactForm"))?;
        let parent = form
            .parent_node()
            .ok_or(SurfaceError::MissingElement("#contactForm parent"))?;

        let banner = self.create("div")?;
        banner.set_class_name(SUCCESS_BANNER.class);
        let inner = self.create("div")?;
        inner.set_text_content(Some(SUCCESS_BANNER.text));
        if let Some(inner) = inner.dyn_ref::<HtmlElement>() {
            inner.style().set_css_text(&style::banner_css());
        }
        banner.append_child(&inner).map_err(host_error)?;
        parent
            .insert_before(&banner, form.next_sibling().as_ref())
            .map_err(host_error)?;
        self.banners.insert(id, banner);
        Ok(())
    }

    fn remove_success_banner(&mut self, id: BannerId) -> Result<bool, SurfaceError> {
        match self.banners.remove(&id) {
            Some(banner) if banner.is_connected() => {
                banner.remove();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn timestamp_iso8601(&self) -> String {
        js_sys::Date::new_0().to_iso_string().into()
    }
}

impl ScrollSurface for DomSurface {
    fn has_navbar(&self) -> bool {
        self.navbar.is_some()
    }

    fn set_navbar_style(&mut self, style: NavbarStyle) -> Result<(), SurfaceError> {
        let navbar = self
            .navbar
            .as_ref()
            .ok_or(SurfaceError::MissingElement(selectors::NAVBAR))?;
        set_style(navbar, "background", style.background)?;
        set_style(navbar, "box-shadow", style.box_shadow)
    }

    fn reveal(&mut self, target: RevealId) -> Result<(), SurfaceError> {
        let element = self
            .reveal_targets
            .get(target.0 as usize)
            .ok_or(SurfaceError::MissingElement(selectors::REVEAL_TARGETS))?;
        set_style(element, "opacity", "1")?;
        set_style(element, "transform", "translateY(0)")
    }
}

impl ImageSurface for DomSurface {
    fn has_profile_image(&self) -> bool {
        self.profile_image.is_some()
    }

    fn restart_animation(&mut self, kind: AnimationKind) -> Result<bool, SurfaceError> {
        let Some(element) = self
            .document
            .query_selector(kind.selector())
            .map_err(host_error)?
            .and_then(html)
        else {
            return Ok(false);
        };
        set_style(&element, "animation", "none")?;
        // Reading layout forces a reflow so the reassignment restarts it.
        let _ = element.offset_height();
        set_style(&element, "animation", kind.animation())?;
        Ok(true)
    }

    fn set_profile_filter(&mut self, filter: &str) -> Result<(), SurfaceError> {
        match &self.profile_image {
            Some(image) => set_style(image, "filter", filter),
            None => Ok(()),
        }
    }
}

impl NoticeSurface for DomSurface {
    fn append_notification(&mut self, notice: &Notification) -> Result<(), SurfaceError> {
        let node = self
            .create("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SurfaceError::Host("div is not an HTMLElement".into()))?;
        node.set_class_name(&notice.class_name());
        node.set_text_content(Some(&notice.message));
        node.style()
            .set_css_text(&style::notification_css(notice.severity));
        self.body()?.append_child(&node).map_err(host_error)?;
        self.notices.insert(notice.id, node);
        Ok(())
    }

    fn set_notification_animation(
        &mut self,
        id: NoticeId,
        animation: &str,
    ) -> Result<bool, SurfaceError> {
        match self.notices.get(&id) {
            Some(node) if node.is_connected() => {
                set_style(node, "animation", animation)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remove_notification(&mut self, id: NoticeId) -> Result<bool, SurfaceError> {
        match self.notices.remove(&id) {
            Some(node) if node.is_connected() => {
                node.remove();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl FocusSurface for DomSurface {
    fn focus(&mut self, target: FocusTarget) -> Result<(), SurfaceError> {
        self.pending_focus = Some(target);
        Ok(())
    }
}
