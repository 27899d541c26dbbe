use std::time::Duration;

use async_trait::async_trait;

use crate::database::simulate_latency;
use crate::error::Error;

use super::{Template, TemplateId};

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn fetch_templates(&self) -> Result<Vec<Template>, Error>;

    async fn fetch_template_by_id(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<Template>, Error>;
}

/// Templates are only ever seeded, so this store is read-only.
#[derive(Debug)]
pub struct MemoryTemplateStore {
    templates: Vec<Template>,
    latency: Duration,
}

impl MemoryTemplateStore {
    pub fn new(templates: Vec<Template>, latency: Duration) -> MemoryTemplateStore {
        MemoryTemplateStore {
            templates,
            latency,
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_templates(&self) -> Result<Vec<Template>, Error> {
        simulate_latency(self.latency).await;

        Ok(self.templates.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_template_by_id(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<Template>, Error> {
        simulate_latency(self.latency).await;

        let template = self
            .templates
            .iter()
            .find(|template| template.id == template_id)
            .cloned();

        Ok(template)
    }
}
