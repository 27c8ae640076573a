pub mod svg;

use crate::types::map::{MapScene, MarkerIcon, PathStyle};
use crate::types::progress::RouteProgress;
use crate::types::route::Location;

/// Drawing capability a map backend exposes to the tracker.
pub trait MapRenderer {
    fn place_marker(&mut self, location: Location, icon: &MarkerIcon);

    fn place_path(&mut self, locations: &[Location], style: &PathStyle);

    /// Opens a text popup anchored at `location`. Backends without popups may ignore it.
    fn open_popup(&mut self, _location: Location, _text: &str) {}
}

/// Draws `progress` onto `renderer`: the current marker followed by the delivered
/// path, or the fallback marker with the idle popup when nothing is delivered yet.
pub fn render_progress<R: MapRenderer + ?Sized>(
    progress: &RouteProgress,
    scene: &MapScene,
    renderer: &mut R,
) {
    let Some(current) = progress.current() else {
        renderer.place_marker(scene.fallback_location, &scene.marker_icon);
        renderer.open_popup(scene.fallback_location, &scene.idle_message);
        return;
    };

    renderer.place_marker(current.location, &scene.marker_icon);

    let path = progress.path_locations();
    if !path.is_empty() {
        renderer.place_path(&path, &scene.path_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::resolve::resolve;
    use crate::types::route::{RouteFeed, Waypoint};

    #[derive(Debug, PartialEq)]
    enum Call {
        Marker(Location),
        Path(Vec<Location>),
        Popup(Location, String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl MapRenderer for Recorder {
        fn place_marker(&mut self, location: Location, _icon: &MarkerIcon) {
            self.calls.push(Call::Marker(location));
        }

        fn place_path(&mut self, locations: &[Location], _style: &PathStyle) {
            self.calls.push(Call::Path(locations.to_vec()));
        }

        fn open_popup(&mut self, location: Location, text: &str) {
            self.calls.push(Call::Popup(location, text.to_string()));
        }
    }

    #[test]
    fn no_progress_places_fallback_marker_and_popup() {
        let scene = MapScene::default();
        let mut recorder = Recorder::default();
        render_progress(&resolve(None, 0), &scene, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                Call::Marker(Location::new(0.0, 0.0)),
                Call::Popup(Location::new(0.0, 0.0), "Santa's still at the North Pole!".to_string()),
            ]
        );
    }

    #[test]
    fn en_route_places_current_marker_then_path() {
        let feed = RouteFeed::new(vec![
            Waypoint::new(Location::new(1.0, 1.0), 100, 2),
            Waypoint::new(Location::new(2.0, 2.0), 200, 0),
            Waypoint::new(Location::new(3.0, 3.0), 300, 5),
        ]);
        let mut recorder = Recorder::default();
        render_progress(&resolve(Some(&feed), 1000), &MapScene::default(), &mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                Call::Marker(Location::new(3.0, 3.0)),
                Call::Path(vec![Location::new(1.0, 1.0), Location::new(3.0, 3.0)]),
            ]
        );
    }

    #[test]
    fn popups_are_optional_for_backends() {
        struct MarkersOnly(usize);
        impl MapRenderer for MarkersOnly {
            fn place_marker(&mut self, _location: Location, _icon: &MarkerIcon) {
                self.0 += 1;
            }
            fn place_path(&mut self, _locations: &[Location], _style: &PathStyle) {}
        }

        let mut renderer = MarkersOnly(0);
        render_progress(&resolve(None, 0), &MapScene::default(), &mut renderer);
        assert_eq!(renderer.0, 1);
    }
}
