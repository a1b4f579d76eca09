//! Diesel schema for board persistence.

diesel::table! {
    /// Board columns, unique per `(project_id, code)`.
    board_columns (id) {
        /// Column row identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Stable stage code.
        #[max_length = 50]
        code -> Varchar,
        /// Display title.
        #[max_length = 255]
        title -> Varchar,
        /// Presentation position.
        position -> Int4,
    }
}

diesel::table! {
    /// Board tasks.
    board_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Stage code the task sits in.
        #[max_length = 50]
        column_code -> Varchar,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Caller-authoritative position within the stage.
        position -> Int4,
        /// Optional deadline date.
        deadline -> Nullable<Date>,
        /// Tagged assignee payload.
        assignee -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last-modified timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only activity history, indexed on `(project_id, created_at)`
    /// and `(task_id, created_at)`.
    board_activity (id) {
        /// Record identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Task reference, nulled when the task is deleted.
        task_id -> Nullable<Uuid>,
        /// Acting user, null for unauthenticated writes.
        actor_id -> Nullable<Uuid>,
        /// Action kind code.
        #[max_length = 50]
        action -> Varchar,
        /// Source column code for move events.
        #[max_length = 50]
        from_column -> Nullable<Varchar>,
        /// Target column code for move events.
        #[max_length = 50]
        to_column -> Nullable<Varchar>,
        /// Changed fields before the event.
        old_data -> Nullable<Jsonb>,
        /// Changed fields after the event.
        new_data -> Nullable<Jsonb>,
        /// Event timestamp.
        created_at -> Timestamptz,
    }
}
