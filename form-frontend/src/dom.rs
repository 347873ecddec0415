use std::cell::RefCell;
use std::rc::Rc;

use form_shell::render::results_html;
use form_shell::{Command, Controller, Dispatched, ViewState};
use scenario_core::FieldName;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, Window,
};

use crate::transport::FetchApi;
use crate::{input_id, regions_written, BUTTONS, REPORT_EMAIL_ID, RESULTS_ID, SELECT_ID};

struct AppInner {
    controller: Controller<FetchApi>,
    view: RefCell<ViewState>,
    window: Window,
    document: Document,
}

/// Handle to the mounted form. Button handlers keep the app alive on their
/// own; hosts may hold this to trigger commands programmatically.
#[wasm_bindgen]
pub struct FormApp {
    inner: Rc<AppInner>,
}

fn js_err(msg: &str) -> JsValue {
    JsValue::from_str(msg)
}

impl AppInner {
    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    fn select(&self) -> Result<HtmlSelectElement, JsValue> {
        self.document
            .get_element_by_id(SELECT_ID)
            .ok_or_else(|| js_err("scenario select not found"))?
            .dyn_into::<HtmlSelectElement>()
            .map_err(|_| js_err("scenario select is not a <select>"))
    }

    fn results(&self) -> Result<HtmlElement, JsValue> {
        self.document
            .get_element_by_id(RESULTS_ID)
            .ok_or_else(|| js_err("results container not found"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| js_err("results container is not an element"))
    }

    /// Copy what the user typed and selected into the view.
    fn read_dom(&self) -> Result<(), JsValue> {
        let selected = self.select()?.value();
        let mut view = self.view.borrow_mut();
        for field in FieldName::ALL {
            if let Some(input) = self.input(input_id(field)) {
                view.form.set(field, input.value());
            }
        }
        if let Some(email) = self.input(REPORT_EMAIL_ID) {
            view.form.report_email = email.value();
        }
        view.selector.select_value(&selected);
        Ok(())
    }

    fn write_form(&self) {
        let view = self.view.borrow();
        for field in FieldName::ALL {
            if let Some(input) = self.input(input_id(field)) {
                input.set_value(view.form.get(field));
            }
        }
    }

    fn write_selector(&self) -> Result<(), JsValue> {
        let select = self.select()?;
        select.set_inner_html("");
        let view = self.view.borrow();
        for option in view.selector.options() {
            let el = HtmlOptionElement::new_with_text_and_value(&option.label, &option.value)?;
            select.append_child(&el)?;
        }
        select.set_value(view.selector.selected_value());
        Ok(())
    }

    fn write_results(&self) -> Result<(), JsValue> {
        if let Some(panel) = &self.view.borrow().results {
            self.results()?.set_inner_html(&results_html(panel));
        }
        Ok(())
    }

    fn show_notifications(&self) {
        let messages = self.view.borrow_mut().take_notifications();
        for message in messages {
            let _ = self.window.alert_with_message(&message);
        }
    }

    fn render(&self, command: Command, outcome: Option<Dispatched>) -> Result<(), JsValue> {
        let regions = regions_written(command, outcome);
        if regions.form {
            self.write_form();
        }
        if regions.selector {
            self.write_selector()?;
        }
        if regions.results {
            self.write_results()?;
        }
        self.show_notifications();
        Ok(())
    }
}

async fn run(app: Rc<AppInner>, command: Command) {
    if let Err(err) = app.read_dom() {
        web_sys::console::error_1(&err);
        return;
    }
    let outcome = match app.controller.dispatch(&app.view, command).await {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            let msg = format!("{} failed: {err}", command.name());
            web_sys::console::error_1(&JsValue::from_str(&msg));
            None
        }
    };
    if let Err(err) = app.render(command, outcome) {
        web_sys::console::error_1(&err);
    }
}

fn wire_buttons(inner: &Rc<AppInner>) -> Result<(), JsValue> {
    for (id, command) in BUTTONS {
        let Some(button) = inner.document.get_element_by_id(id) else {
            continue;
        };
        let app = inner.clone();
        let cb = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            spawn_local(run(app.clone(), command));
        }));
        button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

#[wasm_bindgen]
impl FormApp {
    /// Bind to the current document. `api_base` defaults to the page origin.
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: Option<String>) -> Result<FormApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;
        let inner = Rc::new(AppInner {
            controller: Controller::new(FetchApi::new(api_base.unwrap_or_default())),
            view: RefCell::new(ViewState::new()),
            window,
            document,
        });
        // Fail early if the page lacks the required regions.
        inner.select()?;
        inner.results()?;
        wire_buttons(&inner)?;
        Ok(FormApp { inner })
    }

    /// Run a command by name (`simulate`, `save`, `load`, `refresh`, `report`).
    pub fn dispatch(&self, command: &str) -> Result<(), JsValue> {
        let command = Command::from_name(command)
            .ok_or_else(|| js_err(&format!("unknown command: {command}")))?;
        spawn_local(run(self.inner.clone(), command));
        Ok(())
    }
}

/// Mount the form and load the saved-scenario list.
#[wasm_bindgen]
pub fn start(api_base: Option<String>) -> Result<FormApp, JsValue> {
    console_error_panic_hook::set_once();
    let app = FormApp::new(api_base)?;
    app.dispatch(Command::Refresh.name())?;
    Ok(app)
}
