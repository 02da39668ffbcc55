// SPDX-License-Identifier: GPL-3.0-only

//! Navigation between the capture screen and feature screens

use crate::screen::Route;
use tracing::info;

/// Receives routes emitted by the capture screen
pub trait NavigationDispatcher {
    fn navigate(&mut self, route: Route);
}

/// In-memory router keeping every route it was asked to open
#[derive(Debug, Clone, Default)]
pub struct Router {
    history: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route currently on top, if any
    pub fn current(&self) -> Option<&Route> {
        self.history.last()
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Leave the current route, returning it
    pub fn back(&mut self) -> Option<Route> {
        self.history.pop()
    }
}

impl NavigationDispatcher for Router {
    fn navigate(&mut self, route: Route) {
        info!(
            screen = %route.screen,
            image = %route.params.image_path,
            "Navigating"
        );
        self.history.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{FeatureTarget, ImageLocator};

    #[test]
    fn test_router_history() {
        let mut router = Router::new();
        assert!(router.current().is_none());

        router.navigate(Route::new(
            FeatureTarget::ColorDetector,
            ImageLocator::new("file:///a.jpg"),
        ));
        router.navigate(Route::new(
            FeatureTarget::QrScanner,
            ImageLocator::new("file:///b.jpg"),
        ));
        assert_eq!(router.history().len(), 2);
        assert_eq!(
            router.current().map(|r| r.screen),
            Some(FeatureTarget::QrScanner)
        );

        assert_eq!(
            router.back().map(|r| r.screen),
            Some(FeatureTarget::QrScanner)
        );
        assert_eq!(
            router.current().map(|r| r.screen),
            Some(FeatureTarget::ColorDetector)
        );
    }
}
