use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};

use crate::{
    algorithms::box_points,
    error::Result,
    types::{Detection, FrameReport},
};

impl FrameReport {
    /// One polygon feature per detected band, in pixel coordinates.
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        let features = self
            .detections()
            .map(detection_feature)
            .collect::<Result<Vec<_>>>()?;

        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("frame_width".to_string(), serde_json::Value::from(self.frame_width));
        foreign_members.insert("frame_height".to_string(), serde_json::Value::from(self.frame_height));

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    pub fn save_geojson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

fn detection_feature(detection: &Detection) -> Result<Feature> {
    let mut ring: Vec<Vec<f64>> = detection
        .contour
        .points
        .iter()
        .map(|p| vec![f64::from(p.x), f64::from(p.y)])
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }

    let corners: Vec<[f64; 2]> = box_points(&detection.features.rotated)
        .iter()
        .map(|&(x, y)| [x, y])
        .collect();

    let mut properties = serde_json::Map::new();
    properties.insert("band".to_string(), serde_json::to_value(detection.band)?);
    properties.insert("area".to_string(), serde_json::Value::from(detection.contour.area()));
    properties.insert("features".to_string(), serde_json::to_value(detection.features)?);
    properties.insert("rotated_box".to_string(), serde_json::to_value(corners)?);

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: Some(geojson::feature::Id::String(detection.band.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxisRect, Band, BlobFeatures, Contour, RotatedRect};
    use imageproc::point::Point;

    #[test]
    fn test_geojson_export() {
        let contour = Contour::new(vec![
            Point::new(0, 0),
            Point::new(30, 0),
            Point::new(30, 20),
            Point::new(0, 20),
        ]);
        let features = BlobFeatures {
            center: (15.0, 10.0),
            offset_x: -35.0,
            offset_y: -30.0,
            bounding: AxisRect { x: 0, y: 0, width: 31, height: 21 },
            rotated: RotatedRect { center: (15.0, 10.0), width: 20.0, height: 30.0, angle: 90.0 },
            is_vertical: false,
        };
        let report = FrameReport {
            blue: None,
            yellow: Some(Detection { band: Band::Yellow, contour, features }),
            frame_width: 100,
            frame_height: 80,
        };

        let collection = report.to_geojson().expect("Should create GeoJSON");
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().expect("Should have properties");
        assert_eq!(properties["band"], serde_json::json!("yellow"));
        assert_eq!(properties["area"], serde_json::json!(600.0));

        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Polygon(rings)) => {
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0].first(), rings[0].last());
            }
            other => panic!("Expected polygon, got {other:?}"),
        }

        let members = collection.foreign_members.expect("Should have members");
        assert_eq!(members["frame_width"], serde_json::json!(100));
    }
}
