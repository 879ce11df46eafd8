use std::sync::{Arc, Mutex};

use geojson::FeatureCollection;

/// Shared handle to the features a control edits.
#[derive(Clone, Debug)]
pub struct VectorSource {
    inner: Arc<Mutex<FeatureCollection>>,
}

impl VectorSource {
    pub fn new(features: FeatureCollection) -> Self {
        Self {
            inner: Arc::new(Mutex::new(features)),
        }
    }

    pub fn empty() -> Self {
        Self::new(FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        })
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .map(|collection| collection.features.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a control gets its features from.
#[derive(Clone, Debug, Default)]
pub struct FeatureInput {
    pub source: Option<VectorSource>,
    pub features: Option<FeatureCollection>,
}

impl FeatureInput {
    /// An existing source wins over a loose collection.
    pub fn into_source(self) -> Option<VectorSource> {
        match (self.source, self.features) {
            (Some(source), _) => Some(source),
            (None, Some(features)) => Some(VectorSource::new(features)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Feature;

    fn point_feature() -> Feature {
        Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![0.1313, 52.1951]))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    #[test]
    fn test_source_wins_over_features() {
        let input = FeatureInput {
            source: Some(VectorSource::empty()),
            features: Some(FeatureCollection {
                bbox: None,
                features: vec![point_feature()],
                foreign_members: None,
            }),
        };

        assert!(input.into_source().unwrap().is_empty());
    }

    #[test]
    fn test_features_wrapped_in_new_source() {
        let input = FeatureInput {
            source: None,
            features: Some(FeatureCollection {
                bbox: None,
                features: vec![point_feature()],
                foreign_members: None,
            }),
        };

        assert_eq!(input.into_source().unwrap().len(), 1);
    }

    #[test]
    fn test_nothing_given() {
        assert!(FeatureInput::default().into_source().is_none());
    }
}
