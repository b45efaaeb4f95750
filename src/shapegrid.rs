use crate::cell::ShapeGridCell;
use crate::config::GridConfig;
use crate::error::ShapeError;
use crate::math::Vector;
use crate::shape::{Rectf, Shape, ShapeKind};
use crate::storage::SparseStorage;
use fnv::FnvHashSet;
use slotmapd::new_key_type;
use slotmapd::SlotMap;

pub type ShapeGridObjects<O> = SlotMap<ShapeGridHandle, StoreObject<O>>;

new_key_type! {
    /// This handle is used to modify the associated object or to update its shape.
    /// It is returned by the _insert_ method of a ShapeGrid.
    pub struct ShapeGridHandle;
}

/// The actual object stored in the store
#[derive(Clone)]
pub struct StoreObject<O> {
    /// User-defined object to be associated with a value
    obj: O,
    pub shape: ShapeKind,
}

/// ShapeGrid is the broad phase of the collision layer: a sparse grid of cells
/// where every stored shape is registered in each cell its bounding box covers.
///
/// Queries first collect the shapes sharing a cell with the query's bounding box,
/// then run the exact [`Shape::intersects`] test on them.
///
/// Moving a shape that spans many cells is proportionally expensive, so the cell
/// size should be about the size of the shapes.
///
/// A SlotMap is used for objects managing, adding a level of indirection between
/// shapes and objects. Removal doesn't alter handles given to the user, while
/// still having constant time access.
///
/// ```rust
/// use flat_collide::{Rectf, ShapeGrid};
///
/// let mut g: ShapeGrid<&str> = ShapeGrid::new(10);
/// let a = g.insert(Rectf::new(0.0, 0.0, 4.0, 4.0), "crate");
/// let b = g.insert(Rectf::new(30.0, 0.0, 34.0, 4.0), "rock");
///
/// let hit: Vec<_> = g.query(&Rectf::new(2.0, 2.0, 6.0, 6.0)).map(|(h, _, _)| h).collect();
/// assert_eq!(hit, vec![a]);
///
/// g.remove(a);
/// assert_eq!(g.handles().collect::<Vec<_>>(), vec![b]);
/// ```
#[derive(Clone)]
pub struct ShapeGrid<O> {
    storage: SparseStorage<ShapeGridCell>,
    objects: ShapeGridObjects<O>,
}

impl<O> ShapeGrid<O> {
    /// Creates an empty grid.
    /// The cell size should be about the same magnitude as your shapes and queries.
    ///
    /// # Panics
    /// If `cell_size` is not positive, see [`from_config`](ShapeGrid::from_config)
    /// for a fallible version.
    pub fn new(cell_size: i32) -> Self {
        assert!(
            cell_size > 0,
            "Cell size ({}) cannot be less than or equal to zero",
            cell_size
        );
        Self {
            storage: SparseStorage::new(cell_size),
            objects: SlotMap::with_key(),
        }
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, ShapeError> {
        config.validate()?;
        log::info!("creating shape grid with cell size {}", config.cell_size);
        Ok(Self::new(config.cell_size))
    }

    fn register(
        storage: &mut SparseStorage<ShapeGridCell>,
        handle: ShapeGridHandle,
        bbox: &Rectf,
    ) {
        let ids: Vec<_> = storage.cell_range(bbox).collect();
        let single = ids.len() == 1;
        for id in ids {
            storage.cell_mut(id).objs.push((handle, single));
        }
    }

    fn unregister(
        storage: &mut SparseStorage<ShapeGridCell>,
        handle: ShapeGridHandle,
        bbox: &Rectf,
    ) {
        for id in storage.cell_range(bbox) {
            storage.modify(id, |cell| cell.remove(handle));
        }
    }

    /// Inserts a new shape with an associated object.
    /// Returns the unique and stable handle to be used with get
    pub fn insert(&mut self, shape: impl Into<ShapeKind>, obj: O) -> ShapeGridHandle {
        let shape = shape.into();
        let Self { storage, objects } = self;

        let h = objects.insert(StoreObject {
            obj,
            shape: shape.clone(),
        });
        let bbox = shape.bounding_box();
        Self::register(storage, h, &bbox);
        log::trace!("inserted {:?} covering {}", h, bbox);
        h
    }

    /// Replaces the shape of an object. Returns `None` if the handle is stale.
    pub fn set_shape(
        &mut self,
        handle: ShapeGridHandle,
        shape: impl Into<ShapeKind>,
    ) -> Option<()> {
        let shape = shape.into();
        let obj = self.objects.get_mut(handle)?;

        Self::unregister(&mut self.storage, handle, &obj.shape.bounding_box());
        Self::register(&mut self.storage, handle, &shape.bounding_box());
        obj.shape = shape;
        Some(())
    }

    /// Moves the shape of an object by `delta`. Returns `None` if the handle is stale.
    pub fn translate(&mut self, handle: ShapeGridHandle, delta: Vector) -> Option<()> {
        let obj = self.objects.get_mut(handle)?;

        let before = obj.shape.bounding_box();
        obj.shape.translate(delta);
        let after = obj.shape.bounding_box();

        // cheap path for shapes staying in the same cells
        if self.storage.cell_range(&before).eq(self.storage.cell_range(&after)) {
            return Some(());
        }

        Self::unregister(&mut self.storage, handle, &before);
        Self::register(&mut self.storage, handle, &after);
        log::trace!("moved {:?} to {}", handle, after);
        Some(())
    }

    /// Removes an object from the grid, returning its associated object.
    /// Returns `None` if the handle is stale.
    pub fn remove(&mut self, handle: ShapeGridHandle) -> Option<O> {
        let st = self.objects.remove(handle)?;
        Self::unregister(&mut self.storage, handle, &st.shape.bounding_box());
        log::trace!("removed {:?}", handle);
        Some(st.obj)
    }

    /// Iterate over all handles
    pub fn handles(&self) -> impl Iterator<Item = ShapeGridHandle> + '_ {
        self.objects.keys()
    }

    /// Iterate over all objects
    pub fn objects(&self) -> impl Iterator<Item = &O> + '_ {
        self.objects.values().map(|x| &x.obj)
    }

    /// Returns a reference to the shape and the associated object, using the handle.
    pub fn get(&self, id: ShapeGridHandle) -> Option<(&ShapeKind, &O)> {
        self.objects.get(id).map(|x| (&x.shape, &x.obj))
    }

    /// Returns the shape and a mutable reference to the associated object, using the handle.
    /// Use `set_shape` or `translate` to change the shape.
    pub fn get_mut(&mut self, id: ShapeGridHandle) -> Option<(&ShapeKind, &mut O)> {
        self.objects.get_mut(id).map(|x| (&x.shape, &mut x.obj))
    }

    /// The underlying storage
    pub fn storage(&self) -> &SparseStorage<ShapeGridCell> {
        &self.storage
    }

    /// Queries for objects intersecting a given shape.
    pub fn query<'a, S: Shape + ?Sized>(
        &'a self,
        shape: &'a S,
    ) -> impl Iterator<Item = (ShapeGridHandle, &'a ShapeKind, &'a O)> + 'a {
        self.query_broad(shape)
            .map(move |h| {
                let obj = &self.objects[h];
                (h, &obj.shape, &obj.obj)
            })
            .filter(move |&(_, x, _)| shape.intersects(x.as_shape()))
    }

    /// Queries for all objects in the cells covered by the bounding box of the given shape.
    /// Each handle is given once.
    pub fn query_broad<S: Shape + ?Sized>(
        &self,
        shape: &S,
    ) -> impl Iterator<Item = ShapeGridHandle> + '_ {
        self.query_cells(shape.bounding_box())
    }

    fn query_cells(&self, bbox: Rectf) -> impl Iterator<Item = ShapeGridHandle> + '_ {
        let storage = &self.storage;
        let mut seen = FnvHashSet::default();

        storage
            .cell_range(&bbox)
            .flat_map(move |id| storage.cell(id))
            .flat_map(|cell| cell.objs.iter().copied())
            .filter_map(move |(h, single_cell)| {
                if single_cell || seen.insert(h) {
                    Some(h)
                } else {
                    None
                }
            })
    }

    /// Every pair of stored shapes that intersect, each pair given once.
    pub fn colliding_pairs(&self) -> Vec<(ShapeGridHandle, ShapeGridHandle)> {
        let mut tested = FnvHashSet::default();
        let mut pairs = vec![];

        for cell in self.storage.cells().values() {
            for (i, &(a, _)) in cell.objs.iter().enumerate() {
                for &(b, _) in &cell.objs[i + 1..] {
                    let key = if a < b { (a, b) } else { (b, a) };
                    if !tested.insert(key) {
                        continue;
                    }
                    if self.objects[a].shape.intersects(self.objects[b].shape.as_shape()) {
                        pairs.push(key);
                    }
                }
            }
        }
        pairs
    }

    /// Returns the number of objects currently available
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Checks if the grid contains objects or not
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{intersect, Polygon};

    fn square(x: f32, y: f32, size: f32) -> Rectf {
        Rectf::new(x, y, x + size, y + size)
    }

    #[test]
    fn test_small_query() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);
        let a = g.insert(square(5.0, 0.0, 1.0), ());
        let b = g.insert(square(11.0, 0.0, 1.0), ());
        let c = g.insert(square(5.0, 8.0, 1.0), ());

        let near: Vec<_> = g.query(&square(4.0, -1.0, 3.0)).map(|x| x.0).collect();
        assert_eq!(near, vec![a]);

        let mid: Vec<_> = g.query(&Rectf::new(4.0, -1.0, 13.0, 2.0)).map(|x| x.0).collect();
        assert!(mid.contains(&a));
        assert!(mid.contains(&b));
        assert!(!mid.contains(&c));

        let far: Vec<_> = g.query(&square(-10.0, -10.0, 40.0)).map(|x| x.0).collect();
        assert_eq!(far.len(), 3);
    }

    #[test]
    fn test_big_query() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);

        for i in 0..100 {
            g.insert(square(i as f32, 0.0, 0.5), ());
        }

        let q: Vec<_> = g
            .query(&Rectf::new(5.75, -1.0, 15.25, 1.0))
            .map(|x| x.0)
            .collect();
        assert_eq!(q.len(), 10); // 6 to 15
    }

    #[test]
    fn test_query_polygon() {
        let mut g: ShapeGrid<u32> = ShapeGrid::new(10);
        let a = g.insert(square(0.0, 0.0, 10.0), 1);
        let b = g.insert(square(20.0, 0.0, 10.0), 2);

        // thin diagonal band going over a's corner but not reaching b
        let mut band = Rectf::new(0.0, 0.0, 30.0, 1.0).as_polygon();
        band.set_translation(Vector::new(5.0, 5.0));
        band.set_rotation(-std::f32::consts::FRAC_PI_4);

        let hit: Vec<_> = g.query(&band).map(|(h, _, o)| (h, *o)).collect();
        assert_eq!(hit, vec![(a, 1)]);

        // b shares cells with the band, it's only filtered by the narrow phase
        assert!(g.query_broad(&band).any(|h| h == b));
    }

    #[test]
    fn test_query_dedup() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);
        let a = g.insert(square(-15.0, -15.0, 30.0), ());

        let hits: Vec<_> = g.query_broad(&square(-20.0, -20.0, 40.0)).collect();
        assert_eq!(hits, vec![a]);
    }

    #[test]
    fn test_translate() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);
        let a = g.insert(square(0.0, 0.0, 2.0), ());

        let probe = square(0.5, 0.5, 1.0);
        assert_eq!(g.query(&probe).count(), 1);

        g.translate(a, Vector::new(1.0, 0.0)).unwrap();
        assert_eq!(g.query(&probe).count(), 1);

        g.translate(a, Vector::new(30.0, 30.0)).unwrap();
        assert_eq!(g.query(&probe).count(), 0);
        assert_eq!(g.query(&square(31.5, 30.5, 1.0)).count(), 1);

        // the old cell is gone
        assert!(g.storage().cell((0, 0)).is_none());
        assert_eq!(g.storage().cells().len(), 1);
    }

    #[test]
    fn test_translate_polygon() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);
        let local = square(0.0, 0.0, 4.0).as_polygon();
        let p = Polygon::from_polygon(&local, Vector::new(1.0, 1.0), 0.3);
        let a = g.insert(p, ());

        g.translate(a, Vector::new(-50.0, 20.0)).unwrap();
        let (shape, _) = g.get(a).unwrap();
        let bbox = shape.bounding_box();
        assert!(g.query(&bbox).any(|(h, _, _)| h == a));
        assert!(g.query(&square(0.0, 0.0, 6.0)).next().is_none());
    }

    #[test]
    fn test_far_away() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);
        let far = Rectf::new(1e11, 1e11, 1e11 + 1e5, 1e11 + 1e5);
        let a = g.insert(far, ());

        let hit: Vec<_> = g.query(&far).map(|x| x.0).collect();
        assert_eq!(hit, vec![a]);

        g.translate(a, Vector::new(1e5, 0.0)).unwrap();
        assert_eq!(g.query(&far.moved(Vector::new(1e5, 0.0))).count(), 1);

        g.set_shape(a, square(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(g.storage().cells().len(), 1);
        assert_eq!(g.query(&square(0.0, 0.0, 2.0)).count(), 1);
    }

    #[test]
    fn test_set_shape() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(10);
        let a = g.insert(square(0.0, 0.0, 1.0), ());

        g.set_shape(a, square(30.0, 30.0, 1.0)).unwrap();

        assert_eq!(g.query(&square(-1.0, -1.0, 3.0)).count(), 0);
        let after: Vec<_> = g.query(&square(29.0, 29.0, 3.0)).map(|x| x.0).collect();
        assert_eq!(after, vec![a]);
    }

    #[test]
    fn test_remove() {
        let mut g: ShapeGrid<i32> = ShapeGrid::new(10);
        let a = g.insert(square(0.0, 0.0, 1.0), 7);

        assert_eq!(g.remove(a), Some(7));
        assert_eq!(g.remove(a), None);
        assert!(g.set_shape(a, square(0.0, 0.0, 1.0)).is_none());
        assert!(g.translate(a, Vector::new(1.0, 1.0)).is_none());

        let b = g.insert(square(0.0, 0.0, 1.0), 8);
        assert_eq!(g.handles().collect::<Vec<_>>(), vec![b]);
        assert_eq!(g.get(b).map(|x| *x.1), Some(8));
        assert!(g.get(a).is_none());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_get_mut() {
        let mut g: ShapeGrid<i32> = ShapeGrid::new(10);
        let h = g.insert(square(5.0, 3.0, 1.0), 42);
        *g.get_mut(h).unwrap().1 = 56;
        assert_eq!(g.get(h).unwrap().1, &56);
    }

    #[test]
    fn test_from_config() {
        assert!(ShapeGrid::<()>::from_config(&GridConfig::default()).is_ok());
        assert_eq!(
            ShapeGrid::<()>::from_config(&GridConfig { cell_size: 0 }).err(),
            Some(ShapeError::InvalidCellSize(0))
        );
    }

    #[test]
    fn test_rand_against_brute_force() {
        let mut g: ShapeGrid<()> = ShapeGrid::new(16);

        fastrand::seed(0);
        let mut shapes = vec![];
        for _ in 0..300 {
            let p = Vector::new(fastrand::f32() * 400.0 - 200.0, fastrand::f32() * 400.0 - 200.0);
            let size = Vector::new(fastrand::f32() * 30.0 + 1.0, fastrand::f32() * 30.0 + 1.0);
            let r = Rectf::from_corners(p, p + size);
            let shape: ShapeKind = if fastrand::bool() {
                r.into()
            } else {
                let mut poly = r.as_polygon();
                poly.set_rotation(fastrand::f32() * 6.0);
                poly.set_translation(p);
                poly.into()
            };
            let h = g.insert(shape.clone(), ());
            shapes.push((h, shape));
        }

        let mut expected = vec![];
        for (i, (a, sa)) in shapes.iter().enumerate() {
            for (b, sb) in &shapes[i + 1..] {
                if intersect(sa, sb) {
                    expected.push(if a < b { (*a, *b) } else { (*b, *a) });
                }
            }
        }
        let mut got = g.colliding_pairs();
        expected.sort();
        got.sort();
        assert_eq!(got, expected);

        for (h, s) in &shapes {
            let mut q: Vec<_> = g.query(s).map(|x| x.0).filter(|x| x != h).collect();
            let mut brute: Vec<_> = shapes
                .iter()
                .filter(|(o, so)| o != h && intersect(s, so))
                .map(|x| x.0)
                .collect();
            q.sort();
            brute.sort();
            assert_eq!(q, brute);
        }
    }
}
