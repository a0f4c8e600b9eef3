// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use linkedin_experience::page::SNAPSHOT_SCRIPT;
use linkedin_experience::{
    DISMISS_SELECTOR, ExtractError, ExtractorConfig, PageHandle, Result, SEE_DETAILS_SELECTOR,
};
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

pub const SEE_DETAILS_LINK: &str = r##"<a data-field="position_contextual_skills_see_details" href="#">Compétences : Python, SQL et +2</a>"##;

/// One role entity with its description in a show-more wrapper inside sub-components.
pub fn role(title: &str, description: &str) -> String {
    format!(
        r#"<div data-view-name="profile-component-entity">
  <div class="display-flex flex-column">
    <a href="/company/1"><span aria-hidden="true">{title}</span></a>
    <span class="t-14 t-black--light"><span aria-hidden="true">Jan 2021 - Present · 3 yrs</span></span>
  </div>
  <div class="pvs-entity__sub-components">
    <ul>
      <li>
        <div class="inline-show-more-text">
          <span aria-hidden="true">{description}</span>
          <span class="visually-hidden">{description}</span>
        </div>
      </li>
    </ul>
  </div>
</div>"#
    )
}

/// A profile page whose experience section lists `entries` in order.
pub fn profile_page(entries: &[String]) -> String {
    let items: String = entries
        .iter()
        .map(|entry| format!("<li class=\"artdeco-list__item\">{}</li>", entry))
        .collect();
    format!(
        r#"<html><body><main>
<section class="artdeco-card">
  <div id="about" class="pv-profile-card__anchor"></div>
  <div><h2><span aria-hidden="true">About</span></h2></div>
  <div><span aria-hidden="true">I am a passionate engineer who likes long walks and clean code.</span></div>
</section>
<section class="artdeco-card">
  <div id="experience" class="pv-profile-card__anchor"></div>
  <div class="pvs-header__container">
    <h2 class="pvs-header__title"><span aria-hidden="true">Expérience</span><span class="visually-hidden">Expérience</span></h2>
  </div>
  <div>
    <ul>{items}</ul>
  </div>
</section>
</main></body></html>"#
    )
}

/// Skills modal markup listing `skills` in order.
pub fn skills_modal(skills: &[&str], with_dismiss: bool) -> String {
    let items: String = skills
        .iter()
        .map(|skill| {
            format!(
                r#"<li><div class="display-flex align-items-center mr1 t-bold"><span aria-hidden="true">{skill}</span><span class="visually-hidden">{skill}</span></div></li>"#
            )
        })
        .collect();
    let dismiss = if with_dismiss {
        r#"<button class="artdeco-modal__dismiss" aria-label="Ignorer">×</button>"#
    } else {
        ""
    };
    format!(
        r#"<div class="artdeco-modal" role="dialog">{dismiss}<div class="artdeco-modal__content"><ul>{items}</ul></div></div>"#
    )
}

/// Config with no settle pause, so tests run fast.
pub fn fast_config() -> ExtractorConfig {
    ExtractorConfig {
        settle_delay_ms: 0,
        ..Default::default()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct PageState {
    modal_open: bool,
    clicks: Vec<String>,
    escapes: usize,
}

/// In-memory page: serves a fixed document, opens `modal` when the
/// skills link is clicked and closes it on dismiss or Escape.
pub struct FakePage {
    body: String,
    modal: Option<String>,
    broken: bool,
    state: Mutex<PageState>,
}

impl FakePage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            modal: None,
            broken: false,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn with_modal(mut self, modal: impl Into<String>) -> Self {
        self.modal = Some(modal.into());
        self
    }

    /// Every script evaluation fails.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    pub fn escapes(&self) -> usize {
        self.state.lock().unwrap().escapes
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn modal_open(&self) -> bool {
        self.state.lock().unwrap().modal_open
    }

    fn current_html(&self) -> String {
        let state = self.state.lock().unwrap();
        match (&self.modal, state.modal_open) {
            (Some(modal), true) => self.body.replace("</body>", &format!("{}</body>", modal)),
            _ => self.body.clone(),
        }
    }

    fn matches(&self, selector: &str) -> Result<bool> {
        let parsed = Selector::parse(selector)
            .map_err(|e| ExtractError::Page(format!("bad selector {}: {:?}", selector, e)))?;
        let document = Html::parse_document(&self.current_html());
        let found = document.select(&parsed).next().is_some();
        Ok(found)
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn evaluate(&self, script: &str) -> Result<Value> {
        if self.broken {
            return Err(ExtractError::Page("Execution context was destroyed".to_string()));
        }
        if script == SNAPSHOT_SCRIPT {
            return Ok(Value::String(self.current_html()));
        }
        if let Some(literal) = script
            .strip_prefix("document.querySelector(")
            .and_then(|rest| rest.strip_suffix(") !== null"))
        {
            let selector: String = serde_json::from_str(literal)?;
            return Ok(Value::Bool(self.matches(&selector)?));
        }
        Err(ExtractError::Script(format!("unsupported script: {}", script)))
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        if self.matches(selector)? {
            Ok(())
        } else {
            Err(ExtractError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if !self.matches(selector)? {
            return Err(ExtractError::ElementNotFound(selector.to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.clicks.push(selector.to_string());
        if selector == SEE_DETAILS_SELECTOR {
            state.modal_open = true;
        } else if selector == DISMISS_SELECTOR {
            state.modal_open = false;
        }
        Ok(())
    }

    async fn press_escape(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.escapes += 1;
        state.modal_open = false;
        Ok(())
    }
}

/// Adds the skills "see details" link below the experience section.
pub fn with_skills_link(page: &str) -> String {
    page.replace("</main>", &format!("{}</main>", SEE_DETAILS_LINK))
}
