//! Virtual stylesheet module ids.

use gale::Layer;

/// Prefix of every id a host may request.
pub const VIRTUAL_PREFIX: &str = "virtual:gale";

/// Prefix of resolved ids, also accepted as a request.
pub const RESOLVED_PREFIX: &str = "/@gale/";

/// One of the stylesheet modules served by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualModule {
    /// Every layer, in layer order
    All,
    Layer(Layer),
}

impl VirtualModule {
    pub const ALL: [VirtualModule; 4] = [
        VirtualModule::All,
        VirtualModule::Layer(Layer::Base),
        VirtualModule::Layer(Layer::Components),
        VirtualModule::Layer(Layer::Utilities),
    ];

    /// Parse a requested id such as `virtual:gale.css`,
    /// `virtual:gale-utilities.css` or `/@gale/gale-base.css`.
    ///
    /// Unknown layer names fall back to the full stylesheet.
    pub fn from_request(id: &str) -> Option<Self> {
        let name = if let Some(rest) = id.strip_prefix(RESOLVED_PREFIX) {
            rest
        } else if id.starts_with(VIRTUAL_PREFIX) {
            &id["virtual:".len()..]
        } else {
            return None;
        };

        let name = name.split('?').next().unwrap_or(name);
        let stem = name.strip_suffix(".css").unwrap_or(name);
        let layer = stem
            .strip_prefix("gale-")
            .and_then(Layer::from_name);

        Some(match layer {
            Some(layer) => VirtualModule::Layer(layer),
            None => VirtualModule::All,
        })
    }

    /// Look up a resolved id.
    pub fn from_resolved(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|module| module.resolved_id() == id)
    }

    /// The id a host imports.
    pub fn id(self) -> &'static str {
        match self {
            VirtualModule::All => "virtual:gale.css",
            VirtualModule::Layer(Layer::Base) => "virtual:gale-base.css",
            VirtualModule::Layer(Layer::Components) => "virtual:gale-components.css",
            VirtualModule::Layer(Layer::Utilities) => "virtual:gale-utilities.css",
        }
    }

    /// The id the host's module graph stores.
    pub fn resolved_id(self) -> &'static str {
        match self {
            VirtualModule::All => "/@gale/gale.css",
            VirtualModule::Layer(Layer::Base) => "/@gale/gale-base.css",
            VirtualModule::Layer(Layer::Components) => "/@gale/gale-components.css",
            VirtualModule::Layer(Layer::Utilities) => "/@gale/gale-utilities.css",
        }
    }

    pub fn layer(self) -> Option<Layer> {
        match self {
            VirtualModule::All => None,
            VirtualModule::Layer(layer) => Some(layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests() {
        assert_eq!(VirtualModule::from_request("virtual:gale.css"), Some(VirtualModule::All));
        assert_eq!(
            VirtualModule::from_request("virtual:gale-utilities.css"),
            Some(VirtualModule::Layer(Layer::Utilities))
        );
        assert_eq!(
            VirtualModule::from_request("/@gale/gale-base.css"),
            Some(VirtualModule::Layer(Layer::Base))
        );
        assert_eq!(VirtualModule::from_request("virtual:gale"), Some(VirtualModule::All));
        assert_eq!(
            VirtualModule::from_request("virtual:gale-unknown.css"),
            Some(VirtualModule::All)
        );
        assert_eq!(VirtualModule::from_request("virtual:other.css"), None);
        assert_eq!(VirtualModule::from_request("src/gale.css"), None);
    }

    #[test]
    fn test_resolved_ids_round_trip() {
        for module in VirtualModule::ALL {
            assert_eq!(VirtualModule::from_resolved(module.resolved_id()), Some(module));
            assert_eq!(VirtualModule::from_request(module.id()), Some(module));
            assert_eq!(VirtualModule::from_request(module.resolved_id()), Some(module));
        }
        assert_eq!(VirtualModule::from_resolved("virtual:gale.css"), None);
    }
}
