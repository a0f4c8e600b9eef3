use crate::error::Result;
use crate::models::{ExtractionResult, ExtractorConfig};
use crate::page::{self, PageHandle};
use crate::parsers;
use crate::parsers::skills::{MODAL_CONTENT_SELECTOR, SKILL_LABEL_SELECTOR};
use scraper::Html;
use tracing::{debug, error, info, warn};

pub const SEE_DETAILS_SELECTOR: &str =
    r#"a[data-field="position_contextual_skills_see_details"]"#;
pub const DISMISS_SELECTOR: &str = "button.artdeco-modal__dismiss";

/// Pulls the latest position's description and skills out of a loaded profile page.
///
/// Holds no state between calls, so one extractor can serve many pages at once.
#[derive(Debug, Clone, Default)]
pub struct ExperienceExtractor {
    config: ExtractorConfig,
}

impl ExperienceExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts the description, then the skills. Never fails: anything
    /// missing or broken is reported as `None` or an empty list.
    pub async fn extract_latest_experience(&self, page: &dyn PageHandle) -> ExtractionResult {
        info!("Starting job description extraction");

        let description = self.extract_description(page).await;
        match &description {
            Some(_) => info!("Job description extracted"),
            None => info!("Job description not found for the latest experience"),
        }

        let technical_skills = self.extract_technical_skills(page).await;

        ExtractionResult {
            description,
            technical_skills,
        }
    }

    /// Description of the most recent position, `None` when there is none.
    pub async fn extract_description(&self, page: &dyn PageHandle) -> Option<String> {
        let html = match page::snapshot(page).await {
            Ok(html) => html,
            Err(e) => {
                error!("Could not read the profile page: {}", e);
                return None;
            }
        };
        describe_latest_experience(&html)
    }

    /// Opens the skills modal, reads it and closes it again. Returns an empty
    /// list if any step fails.
    pub async fn extract_technical_skills(&self, page: &dyn PageHandle) -> Vec<String> {
        match self.read_skills_modal(page).await {
            Ok(skills) => {
                info!("Extracted {} skills", skills.len());
                skills
            }
            Err(e) => {
                warn!("Could not extract technical skills: {}", e);
                self.dismiss_open_modal(page).await;
                Vec::new()
            }
        }
    }

    async fn read_skills_modal(&self, page: &dyn PageHandle) -> Result<Vec<String>> {
        page.wait_for_selector(SEE_DETAILS_SELECTOR, self.config.see_details_timeout())
            .await?;
        page.click(SEE_DETAILS_SELECTOR).await?;

        page.wait_for_selector(SKILL_LABEL_SELECTOR, self.config.skills_timeout())
            .await?;
        let html = page::snapshot(page).await?;
        let skills = parsers::skills::parse_skills(&Html::parse_document(&html));
        debug!("Skills in modal: {:?}", skills);

        self.close_modal(page).await;
        Ok(skills)
    }

    /// Clicks the dismiss button, falling back to Escape.
    async fn close_modal(&self, page: &dyn PageHandle) {
        let clicked = match page
            .wait_for_selector(DISMISS_SELECTOR, self.config.dismiss_timeout())
            .await
        {
            Ok(()) => page.click(DISMISS_SELECTOR).await,
            Err(e) => Err(e),
        };

        if let Err(e) = clicked {
            debug!("Dismiss button unavailable ({}), pressing Escape", e);
            if let Err(e) = page.press_escape().await {
                warn!("Could not close the skills modal: {}", e);
            }
        }
        tokio::time::sleep(self.config.settle_delay()).await;
    }

    /// Best-effort Escape when a failed attempt left a modal open.
    async fn dismiss_open_modal(&self, page: &dyn PageHandle) {
        match page::selector_exists(page, MODAL_CONTENT_SELECTOR).await {
            Ok(true) => {
                if page.press_escape().await.is_ok() {
                    tokio::time::sleep(self.config.settle_delay()).await;
                }
            }
            Ok(false) => {}
            Err(e) => debug!("Could not check for an open modal: {}", e),
        }
    }
}

/// Extracts with the default configuration.
pub async fn extract_latest_experience(page: &dyn PageHandle) -> ExtractionResult {
    ExperienceExtractor::default()
        .extract_latest_experience(page)
        .await
}

/// Runs the locator and the description parser over a page snapshot.
pub fn describe_latest_experience(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let Some(section) = parsers::experience::locate_section(&document) else {
        warn!("Experience section not found");
        return None;
    };

    let Some(role) = parsers::experience::locate_latest_entity(section) else {
        warn!("Latest experience item not found within the experience section");
        return None;
    };
    debug!("Latest experience item: {}", role.preview());

    parsers::description::extract_description(&role)
}
