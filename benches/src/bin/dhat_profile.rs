use st_core::{BlockId, BlockList, ContentType};
use st_engine::{GridConfig, GridEngine, HeightCache};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() {
    let _profiler = dhat::Profiler::new_heap();
    let mut list = BlockList::sequential();
    let mut last = BlockId::from("rect1");
    for i in 0..2000 {
        list.set_text(&last, format!("段落 {}: {}", i, "测试".repeat(10)));
        if i % 10 == 0 {
            list.set_content_type(&last, ContentType::Task);
        }
        match list.on_enter_key(&last) {
            Some(next) => last = next,
            None => break,
        }
    }
    let engine = GridEngine::new();
    let mut cache = HeightCache::new();
    engine.relayout(&mut list, &GridConfig::default(), &mut cache);
    let _ = serde_json::to_string(list.blocks());
}
