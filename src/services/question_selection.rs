//! 选题同步服务 - 业务能力层
//!
//! 组卷时维护"候选池 + 有序已选列表 + 搜索词"三者的一致性。
//! 已选列表是考试顺序的唯一事实来源：池子刷新只做一次对账，
//! 不会因为重新渲染或搜索而丢掉手工排好的顺序。

use crate::error::SelectionError;
use crate::models::Question;
use tracing::debug;

/// 选题同步器
///
/// 职责：
/// - 持有候选池（从题库接口取回的题目列表）
/// - 维护有序的已选题目 ID 列表（插入/拖拽顺序）
/// - 按搜索词过滤候选池展示
/// - 不做任何 I/O，池子由调用方喂入
///
/// 不变式：
/// - 已选列表中的每个 ID 都存在于当前池子
/// - 已选列表中没有重复 ID
#[derive(Debug, Default)]
pub struct QuestionSelection {
    pool: Vec<Question>,
    selected: Vec<i64>,
    search: String,
}

impl QuestionSelection {
    /// 创建空的选题状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 用已有的题目 ID 列表初始化（编辑已有测验时）
    ///
    /// 重复 ID 只保留首次出现；对账要等第一次 set_pool 才会发生。
    pub fn with_selected(ids: Vec<i64>) -> Self {
        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        Self {
            pool: Vec::new(),
            selected,
            search: String::new(),
        }
    }

    /// 替换候选池，并对已选列表做一次对账
    ///
    /// 新池子里不存在的已选 ID 被静默移除（一致性修复，不报错），
    /// 幸存条目保持原有相对顺序，绝不自动追加。
    ///
    /// # 返回
    /// 返回被移除的 ID 数量
    pub fn set_pool(&mut self, pool: Vec<Question>) -> usize {
        let before = self.selected.len();
        self.pool = pool;
        self.selected
            .retain(|id| self.pool.iter().any(|q| q.id == *id));
        let dropped = before - self.selected.len();
        if dropped > 0 {
            debug!("池子刷新后移除了 {} 个失效的已选题目", dropped);
        }
        dropped
    }

    /// 设置搜索词（只影响候选展示，不碰已选列表）
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// 当前搜索词
    pub fn search(&self) -> &str {
        &self.search
    }

    /// 候选题目（未选中的池子条目，按题干做大小写不敏感的子串匹配）
    pub fn candidates(&self) -> Vec<&Question> {
        let needle = self.search.to_lowercase();
        self.pool
            .iter()
            .filter(|q| !self.selected.contains(&q.id))
            .filter(|q| needle.is_empty() || q.content.to_lowercase().contains(&needle))
            .collect()
    }

    /// 切换选中状态
    ///
    /// 不在已选列表则追加到末尾（唯一的新增入口），已在则移除。
    /// 池子里不存在的 ID 不会被加入（保持不变式），返回 false。
    pub fn toggle_select(&mut self, question_id: i64) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| *id == question_id) {
            self.selected.remove(pos);
            return true;
        }
        if self.pool.iter().any(|q| q.id == question_id) {
            self.selected.push(question_id);
            return true;
        }
        debug!("忽略不在池子里的题目: {}", question_id);
        false
    }

    /// 拖拽重排：把 from 位置的条目移动到 to 位置
    ///
    /// 纯数组 splice（先移除再插入），中间条目顺移。
    /// 任一索引越界返回错误且状态不变。
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), SelectionError> {
        let len = self.selected.len();
        if from >= len {
            return Err(SelectionError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(SelectionError::IndexOutOfRange { index: to, len });
        }
        let id = self.selected.remove(from);
        self.selected.insert(to, id);
        Ok(())
    }

    /// 从已选列表移除（不存在则为无动作，不报错）
    pub fn remove(&mut self, question_id: i64) {
        self.selected.retain(|id| *id != question_id);
    }

    /// 是否已选中
    pub fn is_selected(&self, question_id: i64) -> bool {
        self.selected.contains(&question_id)
    }

    /// 已选题目 ID（考试顺序）
    pub fn selected_ids(&self) -> &[i64] {
        &self.selected
    }

    /// 已选题目的完整记录（考试顺序，从池子解析）
    ///
    /// 提交测验时作为 question_ids 的来源。
    pub fn ordered_selection(&self) -> Vec<&Question> {
        self.selected
            .iter()
            .filter_map(|id| self.pool.iter().find(|q| q.id == *id))
            .collect()
    }

    /// 候选池（未过滤）
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    /// 已选数量
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    fn question(id: i64, content: &str) -> Question {
        Question {
            id,
            subject_id: None,
            topic_id: None,
            question_type: QuestionType::McqSingle,
            content: content.to_string(),
            difficulty: None,
            explanation: None,
            options: Vec::new(),
        }
    }

    fn pool_q1_to_q4() -> Vec<Question> {
        vec![
            question(1, "Q1"),
            question(2, "Q2"),
            question(3, "Q3"),
            question(4, "Q4"),
        ]
    }

    #[test]
    fn select_reorder_remove_scenario() {
        // 池子 = [Q1,Q2,Q3,Q4]，依次选 Q1、Q3、Q4
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(3);
        selection.toggle_select(4);
        assert_eq!(selection.selected_ids(), &[1, 3, 4]);

        // reorder(0,2) → [Q3,Q4,Q1]
        selection.reorder(0, 2).expect("合法索引应能重排");
        assert_eq!(selection.selected_ids(), &[3, 4, 1]);

        // remove(Q4) → [Q3,Q1]
        selection.remove(4);
        assert_eq!(selection.selected_ids(), &[3, 1]);
    }

    #[test]
    fn set_pool_drops_missing_ids_silently() {
        // 已选 [Q1,Q2]，新池子缺 Q1 → 已选变成 [Q2]
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(2);

        let dropped = selection.set_pool(vec![question(2, "Q2"), question(3, "Q3")]);
        assert_eq!(dropped, 1);
        assert_eq!(selection.selected_ids(), &[2]);
    }

    #[test]
    fn set_pool_preserves_survivor_order_and_never_appends() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(4);
        selection.toggle_select(2);
        selection.toggle_select(1);
        assert_eq!(selection.selected_ids(), &[4, 2, 1]);

        // 刷新后 Q2 消失、新题 Q5 出现：幸存者保序，Q5 不会被自动选上
        let mut new_pool = pool_q1_to_q4();
        new_pool.retain(|q| q.id != 2);
        new_pool.push(question(5, "Q5"));
        selection.set_pool(new_pool);
        assert_eq!(selection.selected_ids(), &[4, 1]);
    }

    #[test]
    fn pool_invariant_holds_after_any_set_pool() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        for id in [1, 2, 3, 4] {
            selection.toggle_select(id);
        }
        selection.set_pool(vec![question(3, "Q3")]);
        for id in selection.selected_ids() {
            assert!(
                selection.pool().iter().any(|q| q.id == *id),
                "已选 ID 必须指向池子里的题目"
            );
        }
    }

    #[test]
    fn toggle_twice_is_an_involution() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(3);

        let before = selection.selected_ids().to_vec();
        selection.toggle_select(2);
        selection.toggle_select(2);
        // 两次切换后内容与顺序都复原，未触碰的条目保序
        assert_eq!(selection.selected_ids(), before.as_slice());
    }

    #[test]
    fn toggle_never_duplicates() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(1);
        selection.toggle_select(1);
        assert_eq!(selection.selected_ids(), &[1]);
    }

    #[test]
    fn toggle_ignores_ids_outside_pool() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        assert!(!selection.toggle_select(99));
        assert!(selection.is_empty());
    }

    #[test]
    fn reorder_then_inverse_restores_order() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        for id in [1, 2, 3, 4] {
            selection.toggle_select(id);
        }
        let original = selection.selected_ids().to_vec();

        selection.reorder(0, 3).unwrap();
        selection.reorder(3, 0).unwrap();
        assert_eq!(selection.selected_ids(), original.as_slice());

        selection.reorder(1, 2).unwrap();
        selection.reorder(2, 1).unwrap();
        assert_eq!(selection.selected_ids(), original.as_slice());
    }

    #[test]
    fn reorder_same_index_is_a_noop() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(2);
        selection.reorder(1, 1).unwrap();
        assert_eq!(selection.selected_ids(), &[1, 2]);
    }

    #[test]
    fn reorder_out_of_range_fails_and_leaves_state_unchanged() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(2);

        let err = selection.reorder(0, 2).unwrap_err();
        assert_eq!(err, SelectionError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(selection.selected_ids(), &[1, 2]);

        let err = selection.reorder(5, 0).unwrap_err();
        assert_eq!(err, SelectionError::IndexOutOfRange { index: 5, len: 2 });
        assert_eq!(selection.selected_ids(), &[1, 2]);
    }

    #[test]
    fn reorder_on_empty_selection_is_rejected() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        assert!(selection.reorder(0, 0).is_err());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(1);
        selection.toggle_select(2);

        selection.remove(1);
        let after_once = selection.selected_ids().to_vec();
        selection.remove(1);
        assert_eq!(selection.selected_ids(), after_once.as_slice());

        // 不存在的 ID 也是无动作
        selection.remove(42);
        assert_eq!(selection.selected_ids(), &[2]);
    }

    #[test]
    fn search_filters_candidates_case_insensitively() {
        // 池子 ["Algebra basics","Geometry intro"]，已选 Geometry intro
        let mut selection = QuestionSelection::new();
        selection.set_pool(vec![
            question(1, "Algebra basics"),
            question(2, "Geometry intro"),
        ]);
        selection.toggle_select(2);

        selection.set_search("algebra");
        let candidates = selection.candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].content, "Algebra basics");

        // 已选的 Geometry intro 仍在已选展示里
        let ordered = selection.ordered_selection();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].content, "Geometry intro");
    }

    #[test]
    fn search_never_mutates_the_selection() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(3);
        selection.toggle_select(1);

        selection.set_search("不存在的题干");
        assert!(selection.candidates().is_empty());
        assert_eq!(selection.selected_ids(), &[3, 1]);

        selection.set_search("");
        // 候选里不出现已选条目
        let candidate_ids: Vec<i64> = selection.candidates().iter().map(|q| q.id).collect();
        assert_eq!(candidate_ids, vec![2, 4]);
    }

    #[test]
    fn ordered_selection_resolves_full_records_in_exam_order() {
        let mut selection = QuestionSelection::new();
        selection.set_pool(pool_q1_to_q4());
        selection.toggle_select(4);
        selection.toggle_select(2);

        let ordered = selection.ordered_selection();
        let ids: Vec<i64> = ordered.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(ordered[0].content, "Q4");
    }

    #[test]
    fn with_selected_deduplicates_and_reconciles_on_first_pool() {
        let mut selection = QuestionSelection::with_selected(vec![3, 1, 3, 9]);
        assert_eq!(selection.selected_ids(), &[3, 1, 9]);

        // 第一次喂入池子：9 不存在，被对账掉
        selection.set_pool(pool_q1_to_q4());
        assert_eq!(selection.selected_ids(), &[3, 1]);
    }
}
