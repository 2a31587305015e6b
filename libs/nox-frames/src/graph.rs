//! The reference frame graph.
//!
//! Frames live in an append-only arena shared by every [`ReferenceFrame`]
//! handle. Two kinds of edges connect them: rotation edges, created when a
//! frame is oriented relative to another, and angular velocity edges, created
//! by orientation or set explicitly. Shortest paths through either kind are
//! memoized per unordered pair of frames.
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap, VecDeque},
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

use nox_sym::Expr;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::{
    Basis, Config, DCM, Error, Result, Vector,
    orientation::{AngVel, Orientation},
};

static NEXT_GRAPH_UID: AtomicU64 = AtomicU64::new(0);

/// Index of a frame inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(usize);

/// One of the three basis directions of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Axis> {
        Axis::ALL.get(i).copied()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// A vector with its frames reduced to indices, so the graph can store it
/// without holding handles to itself.
type RawVector = BTreeMap<(FrameId, Axis), Expr>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKind {
    Rotation,
    AngVel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Velocity,
    Acceleration,
}

#[derive(Default)]
struct State {
    names: Vec<String>,
    by_name: HashMap<String, FrameId>,
    /// `dcm[(a, b)]` maps `a` components to `b` components.
    dcm: HashMap<(FrameId, FrameId), DCM>,
    /// `ang_vel[(a, b)]` is the angular velocity of `a` in `b`.
    ang_vel: HashMap<(FrameId, FrameId), RawVector>,
    ang_acc: HashMap<(FrameId, FrameId), RawVector>,
    rotation_adj: Vec<Vec<FrameId>>,
    ang_vel_adj: Vec<Vec<FrameId>>,
}

impl State {
    fn adjacency(&self, kind: EdgeKind) -> &[Vec<FrameId>] {
        match kind {
            EdgeKind::Rotation => &self.rotation_adj,
            EdgeKind::AngVel => &self.ang_vel_adj,
        }
    }

    fn link(&mut self, kind: EdgeKind, a: FrameId, b: FrameId) {
        let adj = match kind {
            EdgeKind::Rotation => &mut self.rotation_adj,
            EdgeKind::AngVel => &mut self.ang_vel_adj,
        };
        if !adj[a.0].contains(&b) {
            adj[a.0].push(b);
            adj[b.0].push(a);
        }
    }

    fn no_path(&self, from: FrameId, to: FrameId) -> Error {
        let name = |id: FrameId| self.names.get(id.0).cloned().unwrap_or_default();
        Error::NoPath {
            from: name(from),
            to: name(to),
        }
    }

    fn shortest_path(&self, kind: EdgeKind, from: FrameId, to: FrameId) -> Option<Vec<FrameId>> {
        let adj = self.adjacency(kind);
        let mut prev = vec![None; adj.len()];
        let mut queue = VecDeque::from([from]);
        prev[from.0] = Some(from);
        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to];
                let mut cur = to;
                while cur != from {
                    cur = prev[cur.0]?;
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            for next in &adj[node.0] {
                if prev[next.0].is_none() {
                    prev[next.0] = Some(node);
                    queue.push_back(*next);
                }
            }
        }
        None
    }
}

struct Inner {
    uid: u64,
    config: Config,
    state: RwLock<State>,
    paths: Mutex<HashMap<(EdgeKind, FrameId, FrameId), Arc<[FrameId]>>>,
}

/// A shared, append-only graph of reference frames.
///
/// Cloning a `FrameGraph` is cheap and yields another handle to the same graph.
#[derive(Clone)]
pub struct FrameGraph(Arc<Inner>);

impl Default for FrameGraph {
    fn default() -> Self {
        FrameGraph::new()
    }
}

impl FrameGraph {
    pub fn new() -> Self {
        FrameGraph::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        FrameGraph(Arc::new(Inner {
            uid: NEXT_GRAPH_UID.fetch_add(1, AtomicOrdering::Relaxed),
            config,
            state: RwLock::new(State::default()),
            paths: Mutex::new(HashMap::new()),
        }))
    }

    pub fn config(&self) -> Config {
        self.0.config
    }

    /// Creates a new root frame with no rotation or angular velocity edges.
    pub fn frame(&self, name: impl Into<String>) -> Result<ReferenceFrame> {
        let name = name.into();
        let id = self.insert(&name)?;
        debug!(frame = %name, "created root frame");
        Ok(self.handle(id))
    }

    /// Looks a frame up by name.
    pub fn get(&self, name: &str) -> Option<ReferenceFrame> {
        let id = self.0.state.read().by_name.get(name).copied()?;
        Some(self.handle(id))
    }

    pub fn len(&self) -> usize {
        self.0.state.read().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: FrameId) -> ReferenceFrame {
        ReferenceFrame {
            graph: self.clone(),
            id,
        }
    }

    fn insert(&self, name: &str) -> Result<FrameId> {
        let mut state = self.0.state.write();
        if state.by_name.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let id = FrameId(state.names.len());
        state.names.push(name.to_string());
        state.by_name.insert(name.to_string(), id);
        state.rotation_adj.push(Vec::new());
        state.ang_vel_adj.push(Vec::new());
        Ok(id)
    }

    fn name_of(&self, id: FrameId) -> String {
        self.0
            .state
            .read()
            .names
            .get(id.0)
            .cloned()
            .unwrap_or_default()
    }

    fn no_path(&self, from: FrameId, to: FrameId) -> Error {
        self.0.state.read().no_path(from, to)
    }

    /// Shortest path from `from` to `to`, inclusive of both ends.
    fn path(&self, kind: EdgeKind, from: FrameId, to: FrameId) -> Result<Arc<[FrameId]>> {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let cached = self.0.paths.lock().get(&(kind, lo, hi)).cloned();
        let forward = match cached {
            Some(path) => {
                trace!(?kind, ?lo, ?hi, "path cache hit");
                path
            }
            None => {
                trace!(?kind, ?lo, ?hi, "path cache miss");
                let found = self.0.state.read().shortest_path(kind, lo, hi);
                let path: Arc<[FrameId]> = found.ok_or_else(|| self.no_path(from, to))?.into();
                self.0.paths.lock().insert((kind, lo, hi), path.clone());
                path
            }
        };
        if from == lo {
            Ok(forward)
        } else {
            Ok(forward.iter().rev().copied().collect())
        }
    }

    fn dcm(&self, from: FrameId, to: FrameId) -> Result<DCM> {
        if from == to {
            return Ok(DCM::identity());
        }
        let path = self.path(EdgeKind::Rotation, from, to)?;
        let state = self.0.state.read();
        let mut out = DCM::identity();
        for step in path.windows(2) {
            let edge = state
                .dcm
                .get(&(step[0], step[1]))
                .ok_or_else(|| state.no_path(step[0], step[1]))?;
            out = edge * &out;
        }
        Ok(out)
    }

    fn to_raw(&self, v: &Vector, at: FrameId) -> Result<RawVector> {
        let mut raw = RawVector::new();
        for (basis, coeff) in v.terms() {
            if basis.frame.graph.0.uid != self.0.uid {
                return Err(Error::NoPath {
                    from: basis.frame.name(),
                    to: self.name_of(at),
                });
            }
            raw.insert((basis.frame.id, basis.axis), coeff.clone());
        }
        Ok(raw)
    }

    fn from_raw(&self, raw: &RawVector) -> Vector {
        raw.iter()
            .map(|((id, axis), coeff)| {
                (
                    Basis {
                        frame: self.handle(*id),
                        axis: *axis,
                    },
                    coeff.clone(),
                )
            })
            .collect()
    }

    fn set_motion(&self, motion: Motion, frame: FrameId, other: FrameId, value: RawVector) {
        let negated: RawVector = value.iter().map(|(k, v)| (*k, -v)).collect();
        let mut state = self.0.state.write();
        let table = match motion {
            Motion::Velocity => &mut state.ang_vel,
            Motion::Acceleration => &mut state.ang_acc,
        };
        table.insert((frame, other), value);
        table.insert((other, frame), negated);
        if motion == Motion::Velocity {
            state.link(EdgeKind::AngVel, frame, other);
        }
    }

    fn orient(
        &self,
        parent: &ReferenceFrame,
        name: &str,
        orientation: &Orientation,
    ) -> Result<ReferenceFrame> {
        let resolved = orientation.resolve(parent)?;
        let id = self.insert(name)?;
        let p = parent.id;
        let ang_vel: RawVector = match resolved.ang_vel {
            AngVel::InParent(w) => axis_terms(p, w),
            AngVel::InChild(w) => axis_terms(id, w),
        };
        {
            let mut state = self.0.state.write();
            let transpose = resolved.child_to_parent.transpose();
            state.dcm.insert((id, p), resolved.child_to_parent);
            state.dcm.insert((p, id), transpose);
            state.link(EdgeKind::Rotation, id, p);
        }
        self.set_motion(Motion::Velocity, id, p, ang_vel);
        debug!(frame = %name, parent = %parent, method = orientation.method(), "oriented frame");
        Ok(self.handle(id))
    }
}

fn axis_terms(frame: FrameId, w: [Expr; 3]) -> RawVector {
    Axis::ALL
        .into_iter()
        .zip(w)
        .filter(|(_, e)| !e.is_zero())
        .map(|(axis, e)| ((frame, axis), e))
        .collect()
}

/// A handle to one frame of a [`FrameGraph`].
///
/// Handles compare and order by graph identity, then by creation order.
#[derive(Clone)]
pub struct ReferenceFrame {
    graph: FrameGraph,
    id: FrameId,
}

impl ReferenceFrame {
    pub fn graph(&self) -> &FrameGraph {
        &self.graph
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn name(&self) -> String {
        self.graph.name_of(self.id)
    }

    pub fn basis(&self, axis: Axis) -> Basis {
        Basis {
            frame: self.clone(),
            axis,
        }
    }

    pub fn unit(&self, axis: Axis) -> Vector {
        Vector::unit(self.basis(axis))
    }

    pub fn x(&self) -> Vector {
        self.unit(Axis::X)
    }

    pub fn y(&self) -> Vector {
        self.unit(Axis::Y)
    }

    pub fn z(&self) -> Vector {
        self.unit(Axis::Z)
    }

    pub(crate) fn auto_simplify(&self) -> bool {
        self.graph.0.config.auto_simplify
    }

    /// Creates a child frame named `name`, rotated relative to `self`.
    pub fn orient_new(
        &self,
        name: impl Into<String>,
        orientation: Orientation,
    ) -> Result<ReferenceFrame> {
        self.graph.orient(self, &name.into(), &orientation)
    }

    /// The direction cosine matrix that maps components in `self` to
    /// components in `to`.
    pub fn dcm(&self, to: &ReferenceFrame) -> Result<DCM> {
        self.check_same_graph(to)?;
        self.graph.dcm(self.id, to.id)
    }

    /// Sets the angular velocity of `self` in `other`; `other` sees the negation.
    pub fn set_ang_vel(&self, other: &ReferenceFrame, value: &Vector) -> Result<()> {
        self.check_same_graph(other)?;
        let raw = self.graph.to_raw(value, self.id)?;
        self.graph.set_motion(Motion::Velocity, self.id, other.id, raw);
        debug!(frame = %self, other = %other, "set angular velocity");
        Ok(())
    }

    /// Angular velocity of `self` in `other`.
    pub fn ang_vel_in(&self, other: &ReferenceFrame) -> Result<Vector> {
        self.check_same_graph(other)?;
        if self == other {
            return Ok(Vector::zero());
        }
        let direct = self
            .graph
            .0
            .state
            .read()
            .ang_vel
            .get(&(self.id, other.id))
            .cloned();
        if let Some(raw) = direct {
            return Ok(self.graph.from_raw(&raw));
        }
        let path = self.graph.path(EdgeKind::AngVel, self.id, other.id)?;
        let state = self.graph.0.state.read();
        let mut out = Vector::zero();
        for step in path.windows(2) {
            let raw = state
                .ang_vel
                .get(&(step[0], step[1]))
                .ok_or_else(|| state.no_path(step[0], step[1]))?;
            out = out + self.graph.from_raw(raw);
        }
        Ok(out)
    }

    /// Sets the angular acceleration of `self` in `other`.
    pub fn set_ang_acc(&self, other: &ReferenceFrame, value: &Vector) -> Result<()> {
        self.check_same_graph(other)?;
        let raw = self.graph.to_raw(value, self.id)?;
        self.graph.set_motion(Motion::Acceleration, self.id, other.id, raw);
        Ok(())
    }

    /// Angular acceleration of `self` in `other`: the explicit value if one
    /// was set, otherwise the time derivative of the angular velocity taken
    /// in `other`.
    pub fn ang_acc_in(&self, other: &ReferenceFrame) -> Result<Vector> {
        self.check_same_graph(other)?;
        let explicit = self
            .graph
            .0
            .state
            .read()
            .ang_acc
            .get(&(self.id, other.id))
            .cloned();
        match explicit {
            Some(raw) => Ok(self.graph.from_raw(&raw)),
            None => self.ang_vel_in(other)?.dt(other),
        }
    }

    fn check_same_graph(&self, other: &ReferenceFrame) -> Result<()> {
        if self.graph.0.uid == other.graph.0.uid {
            Ok(())
        } else {
            Err(Error::NoPath {
                from: self.name(),
                to: other.name(),
            })
        }
    }
}

impl PartialEq for ReferenceFrame {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReferenceFrame {}

impl PartialOrd for ReferenceFrame {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReferenceFrame {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.graph.0.uid, self.id).cmp(&(other.graph.0.uid, other.id))
    }
}

impl Hash for ReferenceFrame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.0.uid.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceFrame({})", self.name())
    }
}
