// src/rng.rs
//! Детерминированный генератор случайных чисел (Mulberry32)
//!
//! Каждое случайное решение генератора карты берётся из одного потока
//! [`SeededRandom`], созданного из явного сида. Один и тот же сид даёт одну
//! и ту же последовательность на любой платформе.

use rand::{RngCore, SeedableRng};

/// Аддитивная константа шага состояния
const STATE_INCREMENT: u32 = 0x6D2B_79F5;
/// Множитель перемешивания
const MIX_MULTIPLIER: u32 = 0xCA4B_DEA9;
/// 2^32 для нормализации в [0, 1)
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Поток псевдослучайных чисел с 32-битным состоянием.
///
/// Повторное «сидирование» создаёт новый независимый поток через
/// [`SeededRandom::new`]; уже выданный поток не изменяется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Следующее сырое 32-битное значение
    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let mut t = self.state ^ (self.state >> 15);
        t = t.wrapping_mul(MIX_MULTIPLIER);
        t ^ (t >> 15)
    }

    /// Число в диапазоне [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }

    /// Равномерное целое из `0..n` (`floor(next * n)`)
    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64).floor() as usize).min(n.saturating_sub(1))
    }

    /// `true` с вероятностью `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Равномерное смещение в пределах ±`half_width`
    pub fn spread(&mut self, half_width: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * half_width
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_raw());
        let high = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRandom {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
