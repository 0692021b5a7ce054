//! Denormalized counter maintenance for posts.
//!
//! Every child mutation on a post maps to exactly one counter and one update
//! strategy. Store backends ask this module *what* to do and only decide *how*
//! (an in-place integer update in memory, an `UPDATE posts ...` in Postgres).
//!
//! Strategy table:
//! - comment added -> `commentCount + 1`
//! - comment removed -> `commentCount := COUNT(live comments)`
//! - like added -> `likeCount + 1`
//! - like removed -> `likeCount - 1` (floored at 0)
//!
//! Recount is the reconciliation path: it ignores the stored value and any drift
//! it may carry. `reconcile` applies it to both counters at once.

/// Which denormalized column on a post a child event touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Comments,
}

impl Counter {
    pub const ALL: [Counter; 2] = [Counter::Likes, Counter::Comments];

    /// Quoted column name on `posts`.
    pub fn column(self) -> &'static str {
        match self {
            Counter::Likes => r#""likeCount""#,
            Counter::Comments => r#""commentCount""#,
        }
    }

    /// Child table whose rows this counter mirrors.
    pub fn child_table(self) -> &'static str {
        match self {
            Counter::Likes => "likes",
            Counter::Comments => "comments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildEvent {
    CommentAdded,
    CommentRemoved,
    LikeAdded,
    LikeRemoved,
}

impl ChildEvent {
    pub fn counter(self) -> Counter {
        match self {
            ChildEvent::CommentAdded | ChildEvent::CommentRemoved => Counter::Comments,
            ChildEvent::LikeAdded | ChildEvent::LikeRemoved => Counter::Likes,
        }
    }

    pub fn update(self) -> CounterUpdate {
        match self {
            ChildEvent::CommentAdded | ChildEvent::LikeAdded => CounterUpdate::Increment,
            ChildEvent::CommentRemoved => CounterUpdate::Recount,
            // The like row was found and removed under the same aggregate lock,
            // so a decrement cannot undercount.
            ChildEvent::LikeRemoved => CounterUpdate::Decrement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    Increment,
    Decrement,
    Recount,
}

impl CounterUpdate {
    /// Next stored value. `live` is the current number of child rows and is only
    /// evaluated for `Recount`.
    pub fn apply(self, current: i64, live: impl FnOnce() -> i64) -> i64 {
        match self {
            CounterUpdate::Increment => current + 1,
            CounterUpdate::Decrement => (current - 1).max(0),
            CounterUpdate::Recount => live(),
        }
    }

    /// SQL expression producing the next value for `counter`.
    /// `$1` must be bound to the post id.
    pub fn sql_expr(self, counter: Counter) -> String {
        let column = counter.column();
        match self {
            CounterUpdate::Increment => format!("{column} + 1"),
            CounterUpdate::Decrement => format!("GREATEST({column} - 1, 0)"),
            CounterUpdate::Recount => format!(
                r#"(SELECT COUNT(*) FROM {} WHERE "postId" = $1)"#,
                counter.child_table()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additions_increment_and_comment_removal_recounts() {
        assert_eq!(ChildEvent::CommentAdded.update(), CounterUpdate::Increment);
        assert_eq!(ChildEvent::LikeAdded.update(), CounterUpdate::Increment);
        assert_eq!(ChildEvent::CommentRemoved.update(), CounterUpdate::Recount);
        assert_eq!(ChildEvent::LikeRemoved.update(), CounterUpdate::Decrement);

        assert_eq!(ChildEvent::CommentRemoved.counter(), Counter::Comments);
        assert_eq!(ChildEvent::LikeAdded.counter(), Counter::Likes);
    }

    #[test]
    fn recount_ignores_drifted_value() {
        assert_eq!(CounterUpdate::Recount.apply(42, || 3), 3);
        assert_eq!(CounterUpdate::Increment.apply(2, || unreachable!()), 3);
    }

    #[test]
    fn decrement_never_goes_negative() {
        assert_eq!(CounterUpdate::Decrement.apply(1, || 0), 0);
        assert_eq!(CounterUpdate::Decrement.apply(0, || 0), 0);
    }

    #[test]
    fn sql_expressions_target_the_right_column() {
        assert_eq!(
            CounterUpdate::Increment.sql_expr(Counter::Likes),
            r#""likeCount" + 1"#
        );
        assert_eq!(
            CounterUpdate::Decrement.sql_expr(Counter::Likes),
            r#"GREATEST("likeCount" - 1, 0)"#
        );
        assert_eq!(
            CounterUpdate::Recount.sql_expr(Counter::Comments),
            r#"(SELECT COUNT(*) FROM comments WHERE "postId" = $1)"#
        );
    }
}
