mod about_editor;
