use crate::domain::handle::value_object::NativeHandle;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena mapping small integer handles to owned values.
///
/// Freed slots are reused, and every reuse bumps the slot generation so that a handle issued
/// for the previous occupant no longer resolves.
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for HandleArena<T> {
    fn default() -> Self {
        HandleArena {
            slots: vec![],
            free: vec![],
            len: 0,
        }
    }
}

impl<T> HandleArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> NativeHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return NativeHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        NativeHandle::new(index, 1)
    }

    pub fn get(&self, handle: NativeHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn remove(&mut self, handle: NativeHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let value = slot.value.take()?;
        // u32::MAX wraps to 0 which would read as null, skip it
        slot.generation = slot.generation.checked_add(1).unwrap_or(1);
        self.free.push(handle.index());
        self.len -= 1;
        Some(value)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value. Generations are bumped so outstanding handles go stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.checked_add(1).unwrap_or(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }
}
