pub mod api_user;
pub mod article;
pub mod game;
pub mod group;
pub mod package;
pub mod player;
pub mod update_request;

pub use api_user::ApiUser;
pub use article::Article;
pub use game::Game;
pub use group::Group;
pub use package::Package;
pub use player::Player;
pub use update_request::UpdateRequest;
