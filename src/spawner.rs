use crate::checkpoint::Checkpoint;

/// Instantiates checkpoint markers in the host scene under a common parent.
pub trait MarkerSpawner {
    fn spawn(&mut self, name: &str, checkpoint: &Checkpoint);

    /// Destroys every marker spawned so far, returning how many were removed.
    fn clear(&mut self) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub checkpoint: Checkpoint,
}

/// In-memory marker parent, for hosts that consume the markers directly.
#[derive(Debug, Default)]
pub struct MarkerContainer {
    markers: Vec<Marker>,
}

impl MarkerContainer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}

impl MarkerSpawner for MarkerContainer {
    fn spawn(&mut self, name: &str, checkpoint: &Checkpoint) {
        self.markers.push(Marker {
            name: name.to_string(),
            checkpoint: checkpoint.clone(),
        });
    }

    fn clear(&mut self) -> usize {
        let n = self.markers.len();
        self.markers.clear();
        n
    }
}

impl<S: MarkerSpawner + ?Sized> MarkerSpawner for &mut S {
    #[inline]
    fn spawn(&mut self, name: &str, checkpoint: &Checkpoint) {
        (**self).spawn(name, checkpoint)
    }

    #[inline]
    fn clear(&mut self) -> usize {
        (**self).clear()
    }
}
