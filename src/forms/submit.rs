use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{MadrasaError, Result};

/// 提交中标记，阻止重复提交
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn try_acquire(&self) -> Result<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| MadrasaError::submission_in_progress("A submission is already running"))?;
        Ok(BusyGuard(self.0.clone()))
    }
}

/// 释放时清除提交中标记
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
