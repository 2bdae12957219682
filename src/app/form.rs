use todo_store::todo::{CreateTodoRequest, Origin, Priority, Todo, UpdateTodoRequest};
use todo_store::utils::unicode::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    Completed,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Priority => "Priority",
            FormField::Completed => "Completed",
        }
    }
}

const ADD_FIELDS: &[FormField] = &[FormField::Title, FormField::Description, FormField::Priority];
const EDIT_FIELDS: &[FormField] = &[
    FormField::Title,
    FormField::Description,
    FormField::Priority,
    FormField::Completed,
];

/// Buffers behind the add form and the edit modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoForm {
    pub title: TextField,
    pub description: TextField,
    pub priority: Priority,
    pub completed: bool,
    pub focus: FormField,
    /// Set when editing an existing todo.
    pub target: Option<u64>,
}

impl Default for TodoForm {
    fn default() -> Self {
        Self {
            title: TextField::new(),
            description: TextField::new(),
            priority: Priority::Medium,
            completed: false,
            focus: FormField::Title,
            target: None,
        }
    }
}

impl TodoForm {
    pub fn for_edit(todo: &Todo) -> Self {
        Self {
            title: TextField::with_value(todo.title.clone()),
            description: TextField::with_value(todo.description.clone().unwrap_or_default()),
            priority: todo.priority,
            completed: todo.completed,
            focus: FormField::Title,
            target: Some(todo.id),
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        if self.target.is_some() {
            EDIT_FIELDS
        } else {
            ADD_FIELDS
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + fields.len() - 1) % fields.len()];
    }

    /// The text buffer under focus, if the focused field takes text.
    pub fn focused_text_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Priority | FormField::Completed => None,
        }
    }

    /// Space/arrow behaviour on the non-text fields.
    pub fn cycle_focused(&mut self) {
        match self.focus {
            FormField::Priority => self.priority = self.priority.next(),
            FormField::Completed => self.completed = !self.completed,
            FormField::Title | FormField::Description => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.title.is_blank()
    }

    pub fn to_create_request(&self) -> Option<CreateTodoRequest> {
        if !self.is_valid() {
            return None;
        }
        let mut request = CreateTodoRequest::new(self.title.value().trim(), self.priority)
            .with_origin(Origin::Manual);
        if !self.description.is_blank() {
            request = request.with_description(self.description.value().trim());
        }
        Some(request)
    }

    /// A full update carrying every field of the modal.
    pub fn to_update_request(&self) -> Option<UpdateTodoRequest> {
        let id = self.target?;
        if !self.is_valid() {
            return None;
        }
        Some(UpdateTodoRequest {
            id,
            title: Some(self.title.value().trim().to_string()),
            description: Some(self.description.value().trim().to_string()),
            completed: Some(self.completed),
            priority: Some(self.priority),
        })
    }
}
