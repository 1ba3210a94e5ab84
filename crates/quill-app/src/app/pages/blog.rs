use quill_db::model::blog_post::BlogPost;
use quill_render::blog::{BlogView, render_blog_list_page, render_blog_page};
use quill_service::content::blog_post;
use salvo::writing::Text;
use salvo::{Depot, Request, handler};

use super::PageResult;
use crate::config::{get_categories_from_depot, get_templates_from_depot};
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};

fn view(post: &BlogPost) -> BlogView<'_> {
    BlogView {
        slug: &post.slug,
        content: &post.content,
        date: post.display_date(),
    }
}

/// `GET /blog/{slug}` with the "more blogs" cards.
#[handler]
pub async fn blog_post_page(req: &mut Request, depot: &mut Depot) -> PageResult<Text<String>> {
    let slug = req
        .param::<String>("slug")
        .ok_or_else(|| AppError::BadRequest("Missing slug".to_string()))?;
    Ok(Text::Html(render_post(depot, &slug).await?))
}

async fn render_post(depot: &Depot, slug: &str) -> AppResult<String> {
    let templates = get_templates_from_depot(depot)?;
    let categories = get_categories_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let post = blog_post::published_by_slug(&mut conn, slug).await?;
    let more = blog_post::more_posts(&mut conn, slug).await?;
    let more: Vec<BlogView<'_>> = more.iter().map(view).collect();

    Ok(render_blog_page(&templates, &categories, &view(&post), &more))
}

/// `GET /blogs`
#[handler]
pub async fn index(depot: &mut Depot) -> PageResult<Text<String>> {
    Ok(Text::Html(render_index(depot).await?))
}

async fn render_index(depot: &Depot) -> AppResult<String> {
    let templates = get_templates_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let posts = blog_post::index_posts(&mut conn).await?;
    let views: Vec<BlogView<'_>> = posts.iter().map(view).collect();

    Ok(render_blog_list_page(&templates, &views))
}
