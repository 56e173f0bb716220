/// Sentinel used when a portal omits a name or genre
pub const UNKNOWN: &str = "Unknown";

/// Live category as listed by a portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Single playable live channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub stream_id: Option<String>,
    pub icon_url: Option<String>,
    pub play_url: String,
    pub category_name: String,
}

/// Channels of one category, in upstream order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGroup {
    pub category: String,
    pub channels: Vec<Channel>,
}

impl ChannelGroup {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            channels: Vec::new(),
        }
    }
}

/// Group channels by category name, keeping first-appearance order
pub fn group_by_category(channels: impl IntoIterator<Item = Channel>) -> Vec<ChannelGroup> {
    let mut groups: Vec<ChannelGroup> = Vec::new();
    for channel in channels {
        match groups
            .iter_mut()
            .find(|g| g.category == channel.category_name)
        {
            Some(group) => group.channels.push(channel),
            None => {
                let mut group = ChannelGroup::new(channel.category_name.clone());
                group.channels.push(channel);
                groups.push(group);
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(name: &str, category: &str) -> Channel {
        Channel {
            name: name.to_string(),
            stream_id: None,
            icon_url: None,
            play_url: format!("http://stream/{}", name),
            category_name: category.to_string(),
        }
    }

    #[test]
    fn test_group_by_category_first_appearance() {
        let groups = group_by_category(vec![
            channel("a", "INDIA"),
            channel("b", "CRICKET"),
            channel("c", "INDIA"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "INDIA");
        assert_eq!(groups[1].category, "CRICKET");
        let names: Vec<_> = groups[0].channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
