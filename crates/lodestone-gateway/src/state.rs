use std::sync::Arc;

use lodestone_core::SkuAllocator;

#[derive(Clone)]
pub struct AppState {
    allocator: Arc<dyn SkuAllocator>,
}

impl AppState {
    pub fn new(allocator: Arc<dyn SkuAllocator>) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &dyn SkuAllocator {
        self.allocator.as_ref()
    }
}
