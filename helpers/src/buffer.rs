use std::collections::VecDeque;

/// RingBuffer keeps the most recent `capacity` values, dropping the oldest one when full. It is
/// used to smooth the frame time statistics shown in the GUI.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    capacity: usize,
    values: VecDeque<T>,
}

impl<T: Copy + Into<f64>> RingBuffer<T> {
    pub fn new(capacity: usize) -> RingBuffer<T> {
        let capacity = capacity.max(1);
        RingBuffer {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// get_avg returns the mean of the stored values, or None while the buffer is empty.
    pub fn get_avg(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let sum: f64 = self.values.iter().map(|&v| v.into()).sum();
        Some(sum / self.values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_value_is_dropped_when_full() {
        let mut buf: RingBuffer<u32> = RingBuffer::new(3);
        assert_eq!(buf.get_avg(), None);
        for v in [10, 20, 30, 40].iter() {
            buf.push(*v);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get_avg(), Some(30.0));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buf: RingBuffer<u32> = RingBuffer::new(0);
        buf.push(5);
        buf.push(9);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.get_avg(), Some(9.0));
    }
}
