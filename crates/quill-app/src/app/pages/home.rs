use quill_render::blog::BlogView;
use quill_render::home::render_home_page;
use quill_render::portfolio::CaseStudyCard;
use quill_service::content::{blog_post, case_study};
use salvo::writing::Text;
use salvo::{Depot, handler};

use super::PageResult;
use crate::config::get_templates_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

/// `GET /`
#[handler]
pub async fn home(depot: &mut Depot) -> PageResult<Text<String>> {
    Ok(Text::Html(render(depot).await?))
}

async fn render(depot: &Depot) -> AppResult<String> {
    let templates = get_templates_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let featured = case_study::featured(&mut conn).await?;
    let posts = blog_post::home_posts(&mut conn).await?;

    let card = featured.as_ref().map(|record| CaseStudyCard {
        slug: &record.slug,
        preview: &record.preview,
        category: record.category.as_deref(),
    });
    let blogs: Vec<BlogView<'_>> = posts
        .iter()
        .map(|post| BlogView {
            slug: &post.slug,
            content: &post.content,
            date: post.display_date(),
        })
        .collect();

    tracing::debug!(featured = card.is_some(), blogs = blogs.len(), "Rendering home page");
    Ok(render_home_page(&templates, card.as_ref(), &blogs))
}
