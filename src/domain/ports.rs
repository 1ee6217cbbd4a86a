// Port for reading the current wall-clock time in milliseconds.
//
// The arena stamps projectiles and rooms with this value and derives the tick
// delta from it, so tests can drive time by hand.
pub trait Clock: Send {
    fn now_millis(&self) -> u64;
}
