//! Sidebar model: room list, contacts, and the search filter.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

/// Contact availability shown next to each name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Presence {
    Online,
    Away,
    #[default]
    Offline,
}

impl Presence {
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Online => '●',
            Self::Away => '◐',
            Self::Offline => '○',
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Offline => "offline",
        }
    }
}

/// One row in the room list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
    /// Single character drawn in the avatar slot.
    pub glyph: char,
    pub preview: String,
    pub activity: String,
    pub unread: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub presence: Presence,
}

impl Contact {
    #[must_use]
    pub fn glyph(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

#[derive(Clone, Debug, Default)]
pub struct SidebarState {
    rooms: Vec<RoomSummary>,
    contacts: Vec<Contact>,
    active: Option<usize>,
    query: String,
}

impl SidebarState {
    /// The static room and contact lists shown by the chat page.
    #[must_use]
    pub fn seeded() -> Self {
        let rooms = vec![
            room("tech-talk", "Tech Talk", '#', "Zhang San: Take a look at this new feature", "now", 3),
            room("design-team", "Design Team", 'D', "Li Si: The mockups are updated", "Yesterday", 0),
            room("product-planning", "Product Planning", 'P', "Wang Wu: Next week's schedule", "Wednesday", 0),
        ];
        let contacts = vec![
            contact("Zhang San", "Product manager", Presence::Online),
            contact("Li Si", "UI designer", Presence::Away),
            contact("Wang Wu", "Backend developer", Presence::Offline),
        ];
        Self { rooms, contacts, active: Some(0), query: String::new() }
    }

    #[must_use]
    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[must_use]
    pub fn active_room(&self) -> Option<&RoomSummary> {
        self.active.and_then(|index| self.rooms.get(index))
    }

    #[must_use]
    pub fn is_active(&self, room_id: &str) -> bool {
        self.active_room().is_some_and(|room| room.id == room_id)
    }

    /// Make `room_id` the open conversation and mark it read.
    ///
    /// Returns `false` and leaves the selection alone if no such room exists.
    pub fn select_room(&mut self, room_id: &str) -> bool {
        let Some(index) = self.rooms.iter().position(|room| room.id == room_id) else {
            return false;
        };
        self.rooms[index].unread = 0;
        self.active = Some(index);
        true
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Rooms matching the current query by name or preview.
    #[must_use]
    pub fn visible_rooms(&self) -> Vec<&RoomSummary> {
        let needle = self.needle();
        self.rooms
            .iter()
            .filter(|room| matches(&needle, &room.name) || matches(&needle, &room.preview))
            .collect()
    }

    /// Contacts matching the current query by name or role.
    #[must_use]
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        let needle = self.needle();
        self.contacts
            .iter()
            .filter(|contact| matches(&needle, &contact.name) || matches(&needle, &contact.role))
            .collect()
    }

    /// Header line listing reachable contacts, e.g. `Zhang San, Li Si online`.
    #[must_use]
    pub fn online_summary(&self) -> String {
        let names: Vec<&str> = self
            .contacts
            .iter()
            .filter(|contact| contact.presence != Presence::Offline)
            .map(|contact| contact.name.as_str())
            .collect();
        if names.is_empty() {
            "nobody online".to_owned()
        } else {
            format!("{} online", names.join(", "))
        }
    }

    fn needle(&self) -> String {
        self.query.trim().to_lowercase()
    }
}

fn matches(needle: &str, haystack: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

fn room(id: &str, name: &str, glyph: char, preview: &str, activity: &str, unread: u32) -> RoomSummary {
    RoomSummary {
        id: id.to_owned(),
        name: name.to_owned(),
        glyph,
        preview: preview.to_owned(),
        activity: activity.to_owned(),
        unread,
    }
}

fn contact(name: &str, role: &str, presence: Presence) -> Contact {
    Contact { name: name.to_owned(), role: role.to_owned(), presence }
}
