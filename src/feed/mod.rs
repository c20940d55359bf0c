//! RSS 2.0 feed of published articles. Independent of the subscription
//! gateway; it only shares the HTTP server.

mod content;

use std::io::Cursor;

use anyhow::Context;
pub use content::load_items;
pub use content::parse_item;
pub use content::ContentItem;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Writer;

use crate::configuration::FeedSettings;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Drop drafts, newest first.
pub fn published(items: impl IntoIterator<Item = ContentItem>) -> Vec<ContentItem> {
    let mut items: Vec<_> = items.into_iter().filter(|i| !i.draft).collect();
    items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
    items
}

fn write_text_element(
    writer: &mut XmlWriter,
    name: &str,
    text: &str,
) -> Result<(), anyhow::Error> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write <{name}>"))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .with_context(|| format!("Failed to write <{name}> text"))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write </{name}>"))?;
    Ok(())
}

/// Serialize the published subset of `items` as an RSS 2.0 document.
pub fn build_feed(
    channel: &FeedSettings,
    items: impl IntoIterator<Item = ContentItem>,
) -> Result<String, anyhow::Error> {
    let site = channel.site.trim_end_matches('/');
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer
        .write_event(Event::Start(rss))
        .context("Failed to write rss element")?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .context("Failed to write channel element")?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    write_text_element(&mut writer, "link", &format!("{site}/"))?;
    write_text_element(&mut writer, "language", &channel.language)?;

    for item in published(items) {
        let link = format!("{site}/blog/{}/", item.slug);

        writer
            .write_event(Event::Start(BytesStart::new("item")))
            .context("Failed to write item element")?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "link", &link)?;
        write_text_element(&mut writer, "guid", &link)?;
        write_text_element(&mut writer, "description", &item.description)?;
        write_text_element(&mut writer, "pubDate", &item.pub_date.to_rfc2822())?;
        if let Some(author) = &item.author {
            write_text_element(&mut writer, "author", author)?;
        }
        for tag in &item.tags {
            write_text_element(&mut writer, "category", tag)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("item")))
            .context("Failed to write item end")?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .context("Failed to write channel end")?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .context("Failed to write rss end")?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("Generated feed contains invalid UTF-8")
}
