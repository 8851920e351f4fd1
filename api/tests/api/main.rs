mod contact;
mod health_check;
mod helpers;
mod subscriptions;
