//! Lookup of the page's fixed elements and the HUD writer.

use saboteur_client::hud::HudView;
use saboteur_core::protocol::TrapType;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

/// Fetch the element with `id`, typed as `T`.
pub fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has the wrong element type")))
}

/// The `.trap-btn` options, each tagged by its `data-trap` attribute.
pub fn trap_buttons(document: &Document) -> Result<Vec<(TrapType, HtmlElement)>, JsValue> {
    let nodes = document.query_selector_all(".trap-btn")?;
    let mut buttons = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(button) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let Some(trap) = button.dataset().get("trap").and_then(|t| t.parse().ok()) else {
            tracing::warn!(index = i, "trap button without a valid data-trap");
            continue;
        };
        buttons.push((trap, button));
    }
    Ok(buttons)
}

/// Writes [`HudView`]s into the DOM, touching it only when the view changed.
pub struct HudWriter {
    level: HtmlElement,
    points: HtmlElement,
    time: HtmlElement,
    status: HtmlElement,
    start: HtmlElement,
    next_level: HtmlElement,
    traps: Vec<(TrapType, HtmlElement)>,
    last: Option<HudView>,
}

impl HudWriter {
    pub fn find(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            level: element(document, "level")?,
            points: element(document, "points")?,
            time: element(document, "time")?,
            status: element(document, "status")?,
            start: element(document, "startBtn")?,
            next_level: element(document, "nextLevelBtn")?,
            traps: trap_buttons(document)?,
            last: None,
        })
    }

    pub fn write(&mut self, view: HudView) -> Result<(), JsValue> {
        if self.last.as_ref() == Some(&view) {
            return Ok(());
        }
        self.level.set_text_content(Some(&view.level));
        self.points.set_text_content(Some(&view.points));
        self.time.set_text_content(Some(&view.time));
        self.status.set_text_content(Some(&view.status.text));
        self.status.style().set_property("color", view.status.tone.css())?;
        self.start.set_text_content(Some(view.start_label.text()));
        self.next_level
            .class_list()
            .toggle_with_force("hidden", !view.continue_visible)?;

        for (trap, button) in &self.traps {
            let Some(option) = view.traps.iter().find(|o| o.trap == *trap) else {
                continue;
            };
            let classes = button.class_list();
            classes.toggle_with_force("selected", option.selected)?;
            classes.toggle_with_force("unaffordable", option.unaffordable)?;
        }
        self.last = Some(view);
        Ok(())
    }
}
