mod subscriber_email;

// allow external `use` statements to skip `subscriber_email`
pub use subscriber_email::SubscriberEmail;
