//! Weighted proportional layout along one axis.
//!
//! Pure: takes item constraints and the available extent, returns one
//! placement per item. The container applies the placements.

/// Sizing rules for one container item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraint {
    /// Share of the space relative to the other items. Never zero.
    pub weight: u32,
    pub min_size: u32,
    /// `u32::MAX` means unbounded.
    pub max_size: u32,
    /// Concealed items take no space.
    pub concealed: bool,
}

impl Default for Constraint {
    fn default() -> Self {
        Self {
            weight: 1,
            min_size: 0,
            max_size: u32::MAX,
            concealed: false,
        }
    }
}

impl Constraint {
    fn span(&self) -> u32 {
        self.max_size.saturating_sub(self.min_size)
    }
}

/// Computed main-axis range of an item: `[pos, pos + size)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub pos: u32,
    pub size: u32,
}

impl Placement {
    /// Exclusive end.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.pos.saturating_add(self.size)
    }

    /// True if `offset` falls inside the placement.
    #[must_use]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.pos && offset < self.end()
    }
}

/// Distribute `extent` among `items`.
///
/// Items are sized in ascending order of `max - min` (ties keep item
/// order), each taking its weighted share of what is left, rounded half up
/// and clamped to its bounds, but never so much that the minimums of the
/// items still to be sized stop fitting. Positions are prefix sums in item
/// order. Concealed items get `(pos, 0)`.
///
/// When the minimums do not fit at all, only `priority` (or, if it is
/// `None` or concealed, the first non-concealed item) gets space:
/// `min(extent, max_size)`. Everything else collapses to zero.
#[must_use]
pub fn layout(items: &[Constraint], extent: u32, priority: Option<usize>) -> Vec<Placement> {
    let mut sizes = vec![0u32; items.len()];
    let visible = || items.iter().enumerate().filter(|(_, c)| !c.concealed);
    let total_min: u64 = visible().map(|(_, c)| u64::from(c.min_size)).sum();

    if u64::from(extent) < total_min {
        let chosen = priority
            .filter(|&i| items.get(i).is_some_and(|c| !c.concealed))
            .or_else(|| visible().map(|(i, _)| i).next());
        if let Some(i) = chosen {
            sizes[i] = extent.min(items[i].max_size);
        }
    } else {
        let mut order: Vec<usize> = visible().map(|(i, _)| i).collect();
        order.sort_by_key(|&i| items[i].span());

        let mut remaining = u64::from(extent);
        let mut remaining_weight: u64 = order.iter().map(|&i| u64::from(items[i].weight)).sum();
        let mut remaining_min = total_min;

        for i in order {
            let item = &items[i];
            let weight = u64::from(item.weight);
            remaining_min -= u64::from(item.min_size);

            // u32 extents times summed u32 weights overflow u64
            let share = if remaining_weight == 0 {
                0
            } else {
                let (r, w, rw) = (
                    u128::from(remaining),
                    u128::from(weight),
                    u128::from(remaining_weight),
                );
                ((2 * r * w + rw) / (2 * rw)) as u64
            };
            let size = share
                .min(u64::from(item.max_size))
                .max(u64::from(item.min_size))
                .min(remaining - remaining_min);

            sizes[i] = size as u32;
            remaining -= size;
            remaining_weight -= weight;
        }
    }

    let mut pos = 0u32;
    sizes
        .into_iter()
        .map(|size| {
            let placement = Placement { pos, size };
            pos = pos.saturating_add(size);
            placement
        })
        .collect()
}
