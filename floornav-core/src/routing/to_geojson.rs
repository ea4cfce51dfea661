use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::PathResult;
use crate::Error;
use crate::model::{Floorplan, Waypoint};

impl PathResult {
    /// Converts the path to a `GeoJSON` `FeatureCollection` in pixel coordinates.
    pub fn to_geojson(&self, floorplan: &Floorplan) -> Result<FeatureCollection, Error> {
        self.features(floorplan, |p| p.0)
    }

    /// Same as [`PathResult::to_geojson`] but projected to longitude/latitude
    /// through the floorplan's georeference and calibration.
    pub fn to_geojson_wgs84(&self, floorplan: &Floorplan) -> Result<FeatureCollection, Error> {
        let (Some(georeference), Some(calibration)) =
            (floorplan.georeference(), floorplan.calibration())
        else {
            return Err(Error::NotGeoreferenced);
        };

        self.features(floorplan, |p| {
            let position = georeference.pixel_to_lat_lng(p, calibration.meters_per_pixel);
            Coord {
                x: position.lng,
                y: position.lat,
            }
        })
    }

    pub fn to_geojson_string(&self, floorplan: &Floorplan) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.to_geojson(floorplan)?)?)
    }

    fn features<F>(&self, floorplan: &Floorplan, project: F) -> Result<FeatureCollection, Error>
    where
        F: Fn(Point<f64>) -> Coord<f64>,
    {
        let coords = self
            .waypoints
            .iter()
            .map(|&waypoint| {
                floorplan
                    .waypoint_position(waypoint)
                    .map(&project)
                    .ok_or_else(|| {
                        Error::InvalidData(format!("{waypoint} is no longer on the floorplan"))
                    })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut features = Vec::with_capacity(coords.len() + 1);
        if coords.len() > 1 {
            features.push(self.route_feature(&coords)?);
        }
        for (order, (waypoint, coord)) in self.waypoints.iter().zip(&coords).enumerate() {
            features.push(waypoint_feature(floorplan, *waypoint, *coord, order)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    fn route_feature(&self, coords: &[Coord<f64>]) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords.to_vec())));
        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "feature_type": "route",
                "length_pixels": self.length_pixels,
                "length_meters": self.length_meters,
                "calibrated": self.is_calibrated(),
                "waypoints": self.waypoints,
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn waypoint_feature(
    floorplan: &Floorplan,
    waypoint: Waypoint,
    coord: Coord<f64>,
    order: usize,
) -> Result<Feature, Error> {
    let name = match waypoint {
        Waypoint::Poi(id) => floorplan.poi(id).map(|p| p.name.clone()),
        Waypoint::Node(_) => None,
    };
    let geometry = Geometry::new(GeoJsonValue::from(&Point::from(coord)));
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "feature_type": "waypoint",
            "waypoint": waypoint,
            "order": order,
            "name": name,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::LatLng;
    use crate::routing::find_path;

    fn hallway() -> (Floorplan, PathResult) {
        let mut plan = Floorplan::new();
        let a = plan.add_node(Point::new(0.0, 0.0)).id;
        let b = plan.add_node(Point::new(100.0, 0.0)).id;
        plan.add_segment(a, b).unwrap();
        let p = plan.add_poi(Point::new(100.0, 20.0), "Stage", "stage").id;
        let path = find_path(&plan, a.into(), p.into()).unwrap();
        (plan, path)
    }

    #[test]
    fn pixel_geojson_has_route_and_waypoints() {
        let (plan, path) = hallway();
        let collection = path.to_geojson(&plan).unwrap();
        assert_eq!(collection.features.len(), 4);

        let route = &collection.features[0];
        assert_eq!(
            route.property("feature_type").and_then(|v| v.as_str()),
            Some("route")
        );
        let stage = &collection.features[3];
        assert_eq!(stage.property("name").and_then(|v| v.as_str()), Some("Stage"));
    }

    #[test]
    fn wgs84_export_requires_georeference_and_calibration() {
        let (mut plan, path) = hallway();
        assert!(matches!(
            path.to_geojson_wgs84(&plan),
            Err(Error::NotGeoreferenced)
        ));

        plan.set_georeference(Point::new(0.0, 0.0), LatLng::new(51.5, -0.12), 0.0)
            .unwrap();
        assert!(path.to_geojson_wgs84(&plan).is_err());

        plan.calibrate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0)
            .unwrap();
        let collection = path.to_geojson_wgs84(&plan).unwrap();
        assert_eq!(collection.features.len(), 4);

        let value = serde_json::to_value(&collection).unwrap();
        let lng_lat = |feature: usize| {
            let coords = &value["features"][feature]["geometry"]["coordinates"];
            (coords[0].as_f64().unwrap(), coords[1].as_f64().unwrap())
        };
        let meters_per_degree = 6_378_137.0 * std::f64::consts::PI / 180.0;

        // Anchor pixel lands on the anchor itself
        let (lng, lat) = lng_lat(1);
        assert!((lng + 0.12).abs() < 1e-12);
        assert!((lat - 51.5).abs() < 1e-12);

        // 100 px at 0.5 m/px is 50 m due east
        let (lng, lat) = lng_lat(2);
        let expected_lng = -0.12 + 50.0 / (meters_per_degree * 51.5_f64.to_radians().cos());
        assert!((lng - expected_lng).abs() < 1e-12);
        assert!((lat - 51.5).abs() < 1e-12);

        // 20 px down the image is 10 m south
        let (lng, lat) = lng_lat(3);
        assert!((lng - expected_lng).abs() < 1e-12);
        assert!((lat - (51.5 - 10.0 / meters_per_degree)).abs() < 1e-12);

        let route = &value["features"][0]["geometry"]["coordinates"];
        assert_eq!(route.as_array().map(Vec::len), Some(3));
        assert!((route[2][1].as_f64().unwrap() - lat).abs() < 1e-12);
    }

    #[test]
    fn stale_paths_are_rejected() {
        let (mut plan, path) = hallway();
        let poi = match path.waypoints[2] {
            Waypoint::Poi(id) => id,
            Waypoint::Node(_) => unreachable!(),
        };
        plan.remove_poi(poi).unwrap();
        assert!(matches!(path.to_geojson(&plan), Err(Error::InvalidData(_))));
    }
}
