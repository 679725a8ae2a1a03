use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder, ImageSource};

/// Colour of reaction menu pages.
pub const MENU_EMBED_COLOR: u32 = 0xFF_FF_FF;
/// Colour of the hug/wave/headpat replies.
pub const CUTE_EMBED_COLOR: u32 = 0xFF_C0_CB;
/// Colour of plain informational replies.
pub const NOTICE_EMBED_COLOR: u32 = 0x90_54_30;

/// Shown instead of an empty description; Discord rejects empty embeds.
pub const EMPTY_PAGE_TEXT: &str = "*Nothing to choose from.*";

/// Build one page of a reaction menu.
///
/// `lines` are already prefixed with their control symbol; the footer shows
/// the page position.
pub fn menu_page_embed(
    title: &str,
    lines: &[String],
    page: usize,
    total_pages: usize,
) -> anyhow::Result<Embed> {
    let total_pages = total_pages.max(1);
    let page = page.clamp(1, total_pages);

    let description = if lines.is_empty() {
        EMPTY_PAGE_TEXT.to_owned()
    } else {
        lines.join("\n")
    };

    let footer = EmbedFooterBuilder::new(format!("Page {page}/{total_pages}")).build();

    let embed = EmbedBuilder::new()
        .title(title)
        .color(MENU_EMBED_COLOR)
        .description(description)
        .footer(footer)
        .validate()?
        .build();

    Ok(embed)
}

/// Build an image reply with an optional caption.
pub fn image_embed(description: Option<&str>, image_url: &str) -> anyhow::Result<Embed> {
    let mut builder = EmbedBuilder::new()
        .color(CUTE_EMBED_COLOR)
        .image(ImageSource::url(image_url)?);

    if let Some(description) = description {
        builder = builder.description(description);
    }

    Ok(builder.validate()?.build())
}

/// Build a titled informational embed.
pub fn notice_embed(title: &str, description: impl Into<String>) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .title(title)
        .color(NOTICE_EMBED_COLOR)
        .description(description)
        .validate()?
        .build();

    Ok(embed)
}
