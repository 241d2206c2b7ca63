use crate::schedule::Schedule;

/// Which courses currently sit somewhere in the grid.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assignment {
    placed: Vec<bool>,
    count: usize,
}

impl Assignment {
    pub fn new(courses: usize) -> Self {
        Self {
            placed: vec![false; courses],
            count: 0,
        }
    }

    /// Rebuilds the vector from grid contents. Indices past `courses` are ignored.
    pub fn from_schedule(schedule: &Schedule, courses: usize) -> Self {
        let mut a = Self::new(courses);
        for (_, c) in schedule.placements() {
            a.mark(c);
        }
        a
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn is_placed(&self, course: usize) -> bool {
        self.placed.get(course).copied().unwrap_or(false)
    }

    pub fn mark(&mut self, course: usize) {
        if let Some(p) = self.placed.get_mut(course) {
            if !*p {
                *p = true;
                self.count += 1;
            }
        }
    }

    pub fn unmark(&mut self, course: usize) {
        if let Some(p) = self.placed.get_mut(course) {
            if *p {
                *p = false;
                self.count -= 1;
            }
        }
    }

    pub fn placed_count(&self) -> usize {
        self.count
    }

    pub fn is_complete(&self) -> bool {
        self.count == self.placed.len()
    }

    pub fn unassigned(&self) -> impl Iterator<Item = usize> + '_ {
        self.placed
            .iter()
            .enumerate()
            .filter(|(_, p)| !**p)
            .map(|(i, _)| i)
    }
}
