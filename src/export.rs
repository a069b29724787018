use geo::{Geometry, Point};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use std::path::Path;

use crate::{
    batch::ImageSample,
    components::zones::{ZoneKind, ZoneShape, Zones},
    errors::Result,
};

fn feature(geometry: Geometry<f64>, kind: ZoneKind, role: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("zone".into(), JsonValue::from(kind.to_string()));
    properties.insert("role".into(), JsonValue::from(role));
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn zone_features(zones: &Zones) -> impl Iterator<Item = Feature> + '_ {
    zones.iter().map(|shape| {
        let geometry = match shape {
            ZoneShape::Polygon(polygon) => Geometry::Polygon(polygon.clone()),
            ZoneShape::MultiPolygon(multi_polygon) => {
                Geometry::MultiPolygon(multi_polygon.clone())
            }
        };
        feature(geometry, zones.kind, "area")
    })
}

/// Sampled points of both zones together with the zone outlines,
/// for plotting outside of this crate.
pub fn sample_collection(
    sample: &ImageSample,
    urban: &Zones,
    rural: &Zones,
) -> FeatureCollection {
    let points = [&sample.urban, &sample.rural]
        .into_iter()
        .flat_map(|zone| {
            zone.points.iter().map(move |coord| {
                feature(Geometry::Point(Point::from(*coord)), zone.kind, "point")
            })
        });
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("image".into(), JsonValue::from(sample.image.clone()));
    FeatureCollection {
        bbox: None,
        features: points
            .chain(zone_features(urban))
            .chain(zone_features(rural))
            .collect(),
        foreign_members: Some(foreign_members),
    }
}

pub fn write_sample_geojson<P: AsRef<Path>>(
    path: P,
    sample: &ImageSample,
    urban: &Zones,
    rural: &Zones,
) -> Result<()> {
    let geojson = GeoJson::from(sample_collection(sample, urban, rural));
    std::fs::write(path, geojson.to_string())?;
    Ok(())
}
