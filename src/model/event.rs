//! Discovery events as delivered by a [`DiscoverySource`](crate::discovery::DiscoverySource).

use serde::{Deserialize, Serialize};

/// Whether an instance joined or left the discovery feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryEventKind {
    Appeared,
    Disappeared,
}

/// One lifecycle event for a single physical instance.
///
/// An instance may serve several products, so `produced_names` is a sequence. Events carry no
/// instance identity: the registry only counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEvent {
    pub kind: DiscoveryEventKind,
    pub produced_names: Vec<String>,
}

impl DiscoveryEvent {
    pub fn appeared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: DiscoveryEventKind::Appeared,
            produced_names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn disappeared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: DiscoveryEventKind::Disappeared,
            produced_names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let event: DiscoveryEvent =
            serde_json::from_str(r#"{"kind":"appeared","producedNames":["UserDAO","PageDAO"]}"#)
                .unwrap();
        assert_eq!(event, DiscoveryEvent::appeared(["UserDAO", "PageDAO"]));
    }
}
