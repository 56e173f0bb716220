//! Extended M3U rendering
//!
//! ```text
//! #EXTM3U
//! #EXTGRP:CRICKET
//! #EXTINF:-1 tvg-id="42" tvg-name="Star Sports" tvg-logo="http://..." group-title="CRICKET",Star Sports
//! http://host/live/user/pass/42.m3u8
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::error::PortalError;
use crate::models::{Channel, ChannelGroup};

pub const HEADER: &str = "#EXTM3U";
const GROUP_PREFIX: &str = "#EXTGRP:";
const EXTINF_PREFIX: &str = "#EXTINF:";

lazy_static! {
    /// Regex to parse EXTINF attributes (tvg-id="...", group-title="...", etc)
    static ref ATTR_REGEX: Regex = Regex::new(r#"(\w+(?:-\w+)*)="([^"]*)""#).unwrap();
}

/// Attribute values cannot contain double quotes
fn attr(value: &str) -> String {
    value.replace('"', "'").replace(['\r', '\n'], " ")
}

/// Titles and URLs must stay on one line
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Render groups in arrival order
///
/// Empty groups are skipped; if no channel is left the caller gets
/// [`PortalError::EmptyResult`].
pub fn render(groups: &[ChannelGroup]) -> Result<String, PortalError> {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    let mut written = 0usize;
    for group in groups.iter().filter(|g| !g.channels.is_empty()) {
        let _ = writeln!(out, "{}{}", GROUP_PREFIX, single_line(&group.category));

        for channel in &group.channels {
            write_channel(&mut out, channel);
            written += 1;
        }
    }

    if written == 0 {
        return Err(PortalError::EmptyResult);
    }
    Ok(out)
}

fn write_channel(out: &mut String, channel: &Channel) {
    out.push_str(EXTINF_PREFIX);
    out.push_str("-1");
    if let Some(id) = &channel.stream_id {
        let _ = write!(out, " tvg-id=\"{}\"", attr(id));
    }
    let _ = write!(out, " tvg-name=\"{}\"", attr(&channel.name));
    let _ = write!(
        out,
        " tvg-logo=\"{}\"",
        attr(channel.icon_url.as_deref().unwrap_or_default())
    );
    let _ = writeln!(
        out,
        " group-title=\"{}\",{}",
        attr(&channel.category_name),
        single_line(&channel.name)
    );
    let _ = writeln!(out, "{}", single_line(&channel.play_url));
}

/// Parsed EXTINF line data
#[derive(Debug, Default)]
struct ExtinfData {
    attributes: HashMap<String, String>,
    title: String,
}

/// Parse an EXTINF line
/// Format: #EXTINF:duration tvg-id="..." tvg-name="..." tvg-logo="..." group-title="...",Title
fn parse_extinf(line: &str) -> Option<ExtinfData> {
    let content = line.strip_prefix(EXTINF_PREFIX)?;

    // The title follows the first comma after the last attribute
    let header_end = ATTR_REGEX
        .find_iter(content)
        .last()
        .map(|m| m.end())
        .unwrap_or(0);
    let comma = header_end + content[header_end..].find(',')?;

    let header = &content[..comma];
    let title = content[comma + 1..].trim_end_matches('\r').to_string();

    let attributes = ATTR_REGEX
        .captures_iter(header)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    Some(ExtinfData { attributes, title })
}

/// Read a rendered playlist back into its category groups
pub fn parse_playlist(text: &str) -> Result<Vec<ChannelGroup>, PortalError> {
    // Only blank lines are dropped; titles keep their own whitespace
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    if lines.next().map(str::trim) != Some(HEADER) {
        return Err(PortalError::InvalidPlaylist(
            "missing #EXTM3U header".to_string(),
        ));
    }

    let mut groups: Vec<ChannelGroup> = Vec::new();
    let mut pending: Option<ExtinfData> = None;

    for line in lines {
        if let Some(name) = line.strip_prefix(GROUP_PREFIX) {
            groups.push(ChannelGroup::new(name));
        } else if line.starts_with(EXTINF_PREFIX) {
            pending = parse_extinf(line);
        } else if !line.starts_with('#') {
            let Some(mut extinf) = pending.take() else {
                continue;
            };
            let group = groups.last_mut().ok_or_else(|| {
                PortalError::InvalidPlaylist(format!("entry before any group: {}", line))
            })?;

            let mut take = |key: &str| extinf.attributes.remove(key).filter(|v| !v.is_empty());
            let stream_id = take("tvg-id");
            let icon_url = take("tvg-logo");
            // group-title is lossy (quotes rewritten), the group header is not
            let category_name = group.category.clone();

            group.channels.push(Channel {
                name: extinf.title,
                stream_id,
                icon_url,
                play_url: line.to_string(),
                category_name,
            });
        }
    }

    Ok(groups)
}
