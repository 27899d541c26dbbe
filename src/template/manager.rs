use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use crate::campaign::NewCampaign;
use crate::database::Database;
use crate::error::Error;

use super::{Difficulty, Template, TemplateCustomization, TemplateFilter, TemplateId};

/// Templates shown as featured when no other list is configured.
pub const FEATURED_TEMPLATES: [&str; 3] = [
    "Welcome Email Series",
    "E-commerce Black Friday",
    "Google Ads Search Campaign",
];

pub const MAX_FEATURED: usize = 3;

#[tracing::instrument(skip(db))]
pub async fn get_templates(db: &dyn Database) -> Result<Vec<Template>, Error> {
    let templates = db.templates().fetch_templates().await?;

    Ok(templates)
}

#[tracing::instrument(skip(db))]
pub async fn get_template_by_id(
    db: &dyn Database,
    template_id: TemplateId,
) -> Result<Template, Error> {
    let template = db
        .templates()
        .fetch_template_by_id(template_id)
        .await?
        .ok_or(Error::TemplateNotFound { template_id })?;

    Ok(template)
}

#[tracing::instrument(skip(db))]
pub async fn get_templates_by_category(
    db: &dyn Database,
    category: &str,
) -> Result<Vec<Template>, Error> {
    let filter = TemplateFilter {
        category: Some(category.to_owned()),
        ..Default::default()
    };

    filter_templates(db, &filter).await
}

#[tracing::instrument(skip(db))]
pub async fn get_templates_by_difficulty(
    db: &dyn Database,
    difficulty: Difficulty,
) -> Result<Vec<Template>, Error> {
    let filter = TemplateFilter {
        difficulty: Some(difficulty),
        ..Default::default()
    };

    filter_templates(db, &filter).await
}

#[tracing::instrument(skip(db))]
pub async fn search_templates(db: &dyn Database, query: &str) -> Result<Vec<Template>, Error> {
    let filter = TemplateFilter {
        search: Some(query.to_owned()),
        ..Default::default()
    };

    filter_templates(db, &filter).await
}

#[tracing::instrument(skip(db))]
pub async fn filter_templates(
    db: &dyn Database,
    filter: &TemplateFilter,
) -> Result<Vec<Template>, Error> {
    let templates = db.templates().fetch_templates().await?;

    Ok(templates
        .into_iter()
        .filter(|template| filter.matches(template))
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get_categories(db: &dyn Database) -> Result<Vec<String>, Error> {
    let templates = db.templates().fetch_templates().await?;

    let categories: BTreeSet<String> = templates
        .into_iter()
        .map(|template| template.category)
        .collect();

    Ok(categories.into_iter().collect())
}

/// Templates whose names appear in `names`, in collection order, at most
/// [`MAX_FEATURED`] of them.
#[tracing::instrument(skip(db))]
pub async fn get_featured_templates(
    db: &dyn Database,
    names: &[String],
) -> Result<Vec<Template>, Error> {
    let templates = db.templates().fetch_templates().await?;

    Ok(templates
        .into_iter()
        .filter(|template| names.contains(&template.name))
        .take(MAX_FEATURED)
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get_templates_by_time_range(
    db: &dyn Database,
    min_hours: u32,
    max_hours: u32,
) -> Result<Vec<Template>, Error> {
    let templates = db.templates().fetch_templates().await?;

    Ok(templates
        .into_iter()
        .filter(|template| match template.estimated_hours() {
            Some(hours) => hours >= min_hours && hours <= max_hours,
            None => false,
        })
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get_template_metrics(
    db: &dyn Database,
    template_id: TemplateId,
) -> Result<BTreeMap<String, String>, Error> {
    let template = get_template_by_id(db, template_id).await?;

    Ok(template.metrics)
}

/// Produces a campaign draft from a template. The draft is returned to the
/// caller and is not inserted into the campaign store.
#[tracing::instrument(skip(db))]
pub async fn create_campaign_from_template(
    db: &dyn Database,
    template_id: TemplateId,
    customization: TemplateCustomization,
) -> Result<NewCampaign, Error> {
    let template = get_template_by_id(db, template_id).await?;

    Ok(template.materialize(customization, Utc::now()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as ChronoDuration;
    use serde_json::json;

    use super::*;
    use crate::campaign::{manager as campaign_manager, Channel};
    use crate::database::{test, MemoryDatabase};
    use crate::template::CampaignBlueprint;

    fn template(
        id: u64,
        name: &str,
        category: &str,
        difficulty: Difficulty,
        estimated_time: &str,
        tags: &[&str],
    ) -> Template {
        Template {
            id: TemplateId::new(id),
            name: name.to_string(),
            description: format!("{} template", name),
            category: category.to_string(),
            difficulty,
            estimated_time: estimated_time.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            metrics: vec![("openRate".to_string(), "45%".to_string())]
                .into_iter()
                .collect(),
            template: CampaignBlueprint {
                name: None,
                status: None,
                channel: Channel::Email,
                budget: 1000.0,
                content: Some(json!({ "subject": name })),
            },
        }
    }

    fn database() -> MemoryDatabase {
        MemoryDatabase::new(
            vec![],
            vec![
                template(
                    1,
                    "Welcome Email Series",
                    "Email Marketing",
                    Difficulty::Beginner,
                    "2 hours",
                    &["onboarding"],
                ),
                template(
                    2,
                    "Retargeting Boost",
                    "Display Ads",
                    Difficulty::Advanced,
                    "6 hours",
                    &["Remarketing"],
                ),
                template(
                    3,
                    "Google Ads Search Campaign",
                    "Search Marketing",
                    Difficulty::Intermediate,
                    "4 hours",
                    &["ppc"],
                ),
                template(
                    4,
                    "Product Launch Teaser",
                    "email marketing",
                    Difficulty::Beginner,
                    "about a day",
                    &["launch"],
                ),
                template(
                    5,
                    "E-commerce Black Friday",
                    "Email Marketing",
                    Difficulty::Expert,
                    "8 hours",
                    &["sale"],
                ),
            ],
            Duration::ZERO,
        )
    }

    fn names(templates: Vec<Template>) -> Vec<String> {
        templates.into_iter().map(|template| template.name).collect()
    }

    #[tokio::test]
    async fn get_template_by_id_returns_error_if_doesnt_exist() {
        let template_id = TemplateId::new(77);

        let result = get_template_by_id(&database(), template_id).await;

        assert_eq!(result.unwrap_err(), Error::TemplateNotFound { template_id });
    }

    #[tokio::test]
    async fn category_and_difficulty_are_exact_matches() {
        let db = database();

        let email = get_templates_by_category(&db, "Email Marketing").await.unwrap();
        let beginner = get_templates_by_difficulty(&db, Difficulty::Beginner)
            .await
            .unwrap();

        assert_eq!(
            names(email),
            vec!["Welcome Email Series", "E-commerce Black Friday"]
        );
        assert_eq!(
            names(beginner),
            vec!["Welcome Email Series", "Product Launch Teaser"]
        );
    }

    #[tokio::test]
    async fn categories_are_distinct_sorted_and_case_sensitive() {
        let categories = get_categories(&database()).await.unwrap();

        assert_eq!(
            categories,
            vec![
                "Display Ads",
                "Email Marketing",
                "Search Marketing",
                "email marketing",
            ]
        );
    }

    #[tokio::test]
    async fn featured_follows_allow_list_and_cap() {
        let db = database();
        let defaults: Vec<String> = FEATURED_TEMPLATES.iter().map(|s| s.to_string()).collect();

        let featured = get_featured_templates(&db, &defaults).await.unwrap();
        assert_eq!(
            names(featured),
            vec![
                "Welcome Email Series",
                "Google Ads Search Campaign",
                "E-commerce Black Friday",
            ]
        );

        let everything = names(get_templates(&db).await.unwrap());
        let capped = get_featured_templates(&db, &everything).await.unwrap();
        assert_eq!(capped.len(), MAX_FEATURED);
    }

    #[tokio::test]
    async fn search_matches_any_field() {
        let db = database();

        assert_eq!(
            names(search_templates(&db, "REMARKET").await.unwrap()),
            vec!["Retargeting Boost"]
        );
        assert_eq!(search_templates(&db, "email").await.unwrap().len(), 3);
        assert_eq!(search_templates(&db, "").await.unwrap().len(), 5);
        assert!(search_templates(&db, "no such thing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn time_range_bounds_are_inclusive() {
        let db = database();

        let within = get_templates_by_time_range(&db, 2, 6).await.unwrap();

        assert_eq!(
            names(within),
            vec![
                "Welcome Email Series",
                "Retargeting Boost",
                "Google Ads Search Campaign",
            ]
        );
        assert!(get_templates_by_time_range(&db, 9, 100)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn template_metrics_are_returned() {
        let metrics = get_template_metrics(&database(), TemplateId::new(2))
            .await
            .unwrap();

        assert_eq!(metrics.get("openRate").map(String::as_str), Some("45%"));
    }

    #[tokio::test]
    async fn draft_from_template_is_not_persisted() {
        let db = database();
        let before = Utc::now();

        let draft = create_campaign_from_template(
            &db,
            TemplateId::new(1),
            TemplateCustomization::default(),
        )
        .await
        .unwrap();

        let after = Utc::now();
        assert_eq!(draft.budget, 1000.0);
        assert_eq!(draft.channel, Some(Channel::Email));
        let start = draft.start_date.unwrap();
        let end = draft.end_date.unwrap();
        assert!(start >= before && start <= after);
        assert_eq!(end - start, ChronoDuration::days(30));
        assert!(campaign_manager::get_campaigns(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn draft_can_be_persisted_by_caller() {
        let db = database();

        let draft = create_campaign_from_template(
            &db,
            TemplateId::new(3),
            TemplateCustomization {
                name: Some("Spring Search".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let created = campaign_manager::create_campaign(&db, draft).await.unwrap();

        assert_eq!(created.name, "Spring Search");
        assert_eq!(created.content, Some(json!({ "subject": "Google Ads Search Campaign" })));
        assert_eq!(campaign_manager::get_campaigns(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn draft_from_missing_template_fails() {
        let template_id = TemplateId::new(404);

        let result =
            create_campaign_from_template(&test::empty(), template_id, Default::default()).await;

        assert_eq!(result.unwrap_err(), Error::TemplateNotFound { template_id });
    }
}
